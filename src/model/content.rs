//! Movie records: search hits, detail payloads and watched-list entries

use serde::{Deserialize, Serialize};

/// A movie from search results
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// Single-movie detail as returned by the `i=` lookup.
///
/// OMDb reports every scalar as text (`"148 min"`, `"8.8"`, `"N/A"`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "imdbID", default)]
    pub id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
}

impl MovieDetail {
    /// Leading integer of `"148 min"`, 0 when absent.
    pub fn runtime_minutes(&self) -> u32 {
        self.runtime
            .split_whitespace()
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    pub fn imdb_rating_value(&self) -> f32 {
        self.imdb_rating.trim().parse().unwrap_or(0.0)
    }
}

/// A rated movie in the watched list. Field names match the stored JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WatchedItem {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub runtime: u32,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: f32,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub director: String,
}

impl WatchedItem {
    pub const MAX_RATING: u8 = 10;

    /// Freeze a detail record with the user's rating (clamped to 0..=10).
    pub fn from_detail(id: &str, detail: &MovieDetail, user_rating: u8) -> Self {
        Self {
            id: id.to_string(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            runtime: detail.runtime_minutes(),
            imdb_rating: detail.imdb_rating_value(),
            user_rating: user_rating.min(Self::MAX_RATING),
            plot: detail.plot.clone(),
            actors: detail.actors.clone(),
            director: detail.director.clone(),
        }
    }
}

/// Aggregates shown above the watched list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime: f32,
}

impl WatchedSummary {
    pub fn from_items(items: &[WatchedItem]) -> Self {
        if items.is_empty() {
            return Self::default();
        }
        let n = items.len() as f32;
        Self {
            count: items.len(),
            avg_imdb_rating: items.iter().map(|m| m.imdb_rating).sum::<f32>() / n,
            avg_user_rating: items.iter().map(|m| m.user_rating as f32).sum::<f32>() / n,
            avg_runtime: items.iter().map(|m| m.runtime as f32).sum::<f32>() / n,
        }
    }
}

/// Where the detail panel's content comes from
#[derive(Clone, Debug)]
pub enum DetailStatus {
    Loading,
    Fetched(MovieDetail),
    /// Already in the watched list; shown read-only with the stored rating.
    Watched(WatchedItem),
    Failed(String),
}

/// Detail panel state for the selected movie
#[derive(Clone, Debug)]
pub struct DetailState {
    pub id: String,
    pub status: DetailStatus,
    pub user_rating: u8,
}

impl DetailState {
    pub fn loading(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: DetailStatus::Loading,
            user_rating: 0,
        }
    }

    pub fn watched(item: WatchedItem) -> Self {
        Self {
            id: item.id.clone(),
            user_rating: item.user_rating,
            status: DetailStatus::Watched(item),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match &self.status {
            DetailStatus::Fetched(detail) => Some(detail.title.as_str()),
            DetailStatus::Watched(item) => Some(item.title.as_str()),
            DetailStatus::Loading | DetailStatus::Failed(_) => None,
        }
        .filter(|t| !t.is_empty())
    }

    pub fn can_rate(&self) -> bool {
        matches!(self.status, DetailStatus::Fetched(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inception_detail() -> MovieDetail {
        serde_json::from_value(json!({
            "Title": "Inception",
            "Year": "2010",
            "Runtime": "148 min",
            "Released": "16 Jul 2010",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets...",
            "Poster": "https://example.com/inception.jpg",
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Response": "True"
        }))
        .expect("detail deserialize")
    }

    #[test]
    fn detail_numbers_are_parsed_from_text() {
        let detail = inception_detail();
        assert_eq!(detail.runtime_minutes(), 148);
        assert!((detail.imdb_rating_value() - 8.8).abs() < f32::EPSILON);
    }

    #[test]
    fn unavailable_numbers_fall_back_to_zero() {
        let detail = MovieDetail {
            runtime: "N/A".to_string(),
            imdb_rating: "N/A".to_string(),
            ..Default::default()
        };
        assert_eq!(detail.runtime_minutes(), 0);
        assert_eq!(detail.imdb_rating_value(), 0.0);
    }

    #[test]
    fn watched_item_uses_stored_field_names() {
        let item = WatchedItem::from_detail("tt1375666", &inception_detail(), 10);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["imdbID"], "tt1375666");
        assert_eq!(value["title"], "Inception");
        assert_eq!(value["runtime"], 148);
        assert_eq!(value["userRating"], 10);
        assert_eq!(value["director"], "Christopher Nolan");
        assert!(value.get("imdbRating").is_some());
    }

    #[test]
    fn user_rating_is_clamped() {
        let item = WatchedItem::from_detail("tt1", &inception_detail(), 42);
        assert_eq!(item.user_rating, 10);
    }

    #[test]
    fn summary_averages() {
        let mut a = WatchedItem::from_detail("tt1", &inception_detail(), 10);
        a.imdb_rating = 8.0;
        a.runtime = 100;
        let mut b = a.clone();
        b.id = "tt2".to_string();
        b.imdb_rating = 6.0;
        b.user_rating = 6;
        b.runtime = 120;

        let summary = WatchedSummary::from_items(&[a, b]);
        assert_eq!(summary.count, 2);
        assert!((summary.avg_imdb_rating - 7.0).abs() < 1e-6);
        assert!((summary.avg_user_rating - 8.0).abs() < 1e-6);
        assert!((summary.avg_runtime - 110.0).abs() < 1e-6);
        assert_eq!(WatchedSummary::from_items(&[]), WatchedSummary::default());
    }

    #[test]
    fn only_fetched_details_can_be_rated() {
        let item = WatchedItem::from_detail("tt1", &inception_detail(), 7);
        let watched = DetailState::watched(item);
        assert!(!watched.can_rate());
        assert_eq!(watched.user_rating, 7);
        assert_eq!(watched.title(), Some("Inception"));

        let loading = DetailState::loading("tt1");
        assert!(!loading.can_rate());
        assert_eq!(loading.title(), None);
    }
}
