//! Failure taxonomy for OMDb requests

use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Movie not found";
pub const BAD_STATUS_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network failure, non-success status or an unreadable body.
    #[error("{0}")]
    Transport(String),
    /// The API answered with `Response: "False"`.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    /// The request was superseded or its owner went away.
    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(format!("Network error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_visible_messages() {
        assert_eq!(FetchError::NotFound.to_string(), "Movie not found");
        assert_eq!(
            FetchError::Transport(BAD_STATUS_MESSAGE.to_string()).to_string(),
            "Something went wrong"
        );
        assert_eq!(FetchError::Cancelled.to_string(), "request cancelled");
    }
}
