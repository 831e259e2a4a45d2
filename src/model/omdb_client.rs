//! OMDb API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{log_api_request, log_api_result};
use super::cancel::CancelToken;
use super::content::{MovieDetail, SearchResultItem};
use super::error::{FetchError, BAD_STATUS_MESSAGE};

/// The two lookups the application needs. Implemented by [`OmdbClient`] and by
/// fakes in tests.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn search(
        &self,
        query: &str,
        token: &CancelToken,
    ) -> Result<Vec<SearchResultItem>, FetchError>;

    async fn details(&self, id: &str, token: &CancelToken) -> Result<MovieDetail, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?apikey={}&s={}",
            self.api_base,
            self.api_key,
            urlencoding::encode(query)
        )
    }

    pub fn details_url(&self, id: &str) -> String {
        format!(
            "{}?apikey={}&i={}",
            self.api_base,
            self.api_key,
            urlencoding::encode(id)
        )
    }

    async fn get_body(&self, url: &str, token: &CancelToken) -> Result<String, FetchError> {
        let request = async {
            let res = self.client.get(url).send().await?;
            if !res.status().is_success() {
                tracing::debug!(status = %res.status(), "OMDb returned non-success status");
                return Err(FetchError::Transport(BAD_STATUS_MESSAGE.to_string()));
            }
            Ok(res.text().await?)
        };

        token
            .run_until_cancelled(request)
            .await
            .unwrap_or(Err(FetchError::Cancelled))
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(
        &self,
        query: &str,
        token: &CancelToken,
    ) -> Result<Vec<SearchResultItem>, FetchError> {
        log_api_request!("search", query);
        let result = match self.get_body(&self.search_url(query), token).await {
            Ok(body) => parse_search_body(&body),
            Err(e) => Err(e),
        };
        log_api_result!("search", result);
        result
    }

    async fn details(&self, id: &str, token: &CancelToken) -> Result<MovieDetail, FetchError> {
        log_api_request!("details", id);
        let result = match self.get_body(&self.details_url(id), token).await {
            Ok(body) => parse_details_body(&body),
            Err(e) => Err(e),
        };
        log_api_result!("details", result);
        result
    }
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchResultItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(flatten)]
    detail: MovieDetail,
}

fn is_true(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

fn malformed(e: serde_json::Error) -> FetchError {
    tracing::debug!(error = %e, "Could not decode OMDb body");
    FetchError::Transport(BAD_STATUS_MESSAGE.to_string())
}

pub fn parse_search_body(body: &str) -> Result<Vec<SearchResultItem>, FetchError> {
    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(malformed)?;
    if !is_true(&envelope.response) {
        tracing::debug!(reason = ?envelope.error, "OMDb search returned no match");
        return Err(FetchError::NotFound);
    }
    Ok(envelope.search)
}

pub fn parse_details_body(body: &str) -> Result<MovieDetail, FetchError> {
    let envelope: DetailEnvelope = serde_json::from_str(body).map_err(malformed)?;
    if !is_true(&envelope.response) {
        tracing::debug!(reason = ?envelope.error, "OMDb lookup returned no match");
        return Err(FetchError::NotFound);
    }
    Ok(envelope.detail)
}
