use crate::domain::model::Movie;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MovieError, Result};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_IMAGE_BASE_URL: &str = "http://image.tmdb.org/t/p/";
pub const DEFAULT_IMAGE_SIZE: &str = "w185";

/// How poster paths from the API become absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    base_url: String,
    size: String,
}

impl ImageSettings {
    pub fn new(base_url: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            size: size.into(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.image_base_url(), config.image_size())
    }

    /// Plain concatenation; whether the URL resolves is the image loader's concern.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}{}", self.base_url, self.size, poster_path)
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL, DEFAULT_IMAGE_SIZE)
    }
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    title: String,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    release_date: String,
    vote_average: f64,
}

impl MovieRecord {
    fn into_movie(self, images: &ImageSettings) -> Movie {
        let poster = self.poster_path.map(|path| images.poster_url(&path));
        Movie::new(self.title, self.release_date, poster, self.vote_average, self.overview)
    }
}

fn parse_error(message: impl Into<String>) -> MovieError {
    MovieError::ParseError {
        message: message.into(),
    }
}

/// Decodes a `movie/*` response body into movies, in API order.
///
/// A record with a missing required field (`title`, `release_date`,
/// `vote_average`) or a wrongly typed field is skipped and the rest of the
/// batch is kept. Only an unreadable body or a missing `results` array fails
/// the whole call.
pub fn parse(raw: &str, images: &ImageSettings) -> Result<Vec<Movie>> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|e| parse_error(format!("response is not valid JSON: {}", e)))?;

    if !document.is_object() {
        return Err(parse_error("response is not a JSON object"));
    }

    let records = document
        .get("results")
        .ok_or_else(|| parse_error("response has no `results` field"))?
        .as_array()
        .ok_or_else(|| parse_error("`results` is not an array"))?;

    let mut movies = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match MovieRecord::deserialize(record) {
            Ok(record) => movies.push(record.into_movie(images)),
            Err(e) => tracing::warn!("Skipping malformed record #{}: {}", index, e),
        }
    }

    let skipped = records.len() - movies.len();
    if skipped > 0 {
        tracing::debug!("Parsed {} movies, skipped {}", movies.len(), skipped);
    }

    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(title: &str) -> Value {
        json!({
            "title": title,
            "poster_path": format!("/{}.jpg", title.to_lowercase()),
            "overview": format!("{} overview", title),
            "release_date": "2020-01-02",
            "vote_average": 7.5,
            "popularity": 123.4,
            "id": 42
        })
    }

    #[test]
    fn test_parse_single_record() {
        let raw = r#"{"results":[{"title":"A","poster_path":"/x.jpg","overview":"o","release_date":"2020-01-02","vote_average":7.5}]}"#;
        let movies = parse(raw, &ImageSettings::default()).unwrap();

        assert_eq!(movies.len(), 1);
        let movie = &movies[0];
        assert_eq!(movie.title(), "A");
        assert_eq!(movie.poster_path(), Some("http://image.tmdb.org/t/p/w185/x.jpg"));
        assert_eq!(movie.plot(), Some("o"));
        assert_eq!(movie.release_date(), "2020-01-02");
        assert_eq!(movie.vote_average(), 7.5);
    }

    #[test]
    fn test_parse_skips_malformed_records_and_keeps_order() {
        let raw = json!({
            "page": 1,
            "results": [
                record("First"),
                {"poster_path": "/missing-title.jpg", "release_date": "2020-01-01", "vote_average": 5.0},
                record("Second"),
                {"title": "Bad vote", "release_date": "2020-01-01", "vote_average": "high"},
                "not an object",
                {"title": "Numeric poster", "poster_path": 17, "release_date": "2020-01-01", "vote_average": 1.0},
                record("Third"),
                null
            ]
        })
        .to_string();

        let movies = parse(&raw, &ImageSettings::default()).unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_parse_optional_fields_absent_or_null() {
        let raw = json!({
            "results": [
                {"title": "No poster", "poster_path": null, "release_date": "2019-05-05", "vote_average": 6},
                {"title": "No overview", "poster_path": "/p.jpg", "overview": null, "release_date": "2018-01-01", "vote_average": 3.2}
            ]
        })
        .to_string();

        let movies = parse(&raw, &ImageSettings::default()).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].poster_path(), None);
        assert_eq!(movies[0].plot(), None);
        assert_eq!(movies[0].vote_average(), 6.0);
        assert_eq!(movies[1].plot(), None);
        assert_eq!(movies[1].poster_path(), Some("http://image.tmdb.org/t/p/w185/p.jpg"));
    }

    #[test]
    fn test_parse_batch_level_failures() {
        for raw in ["", "not json", r#"{"foo":1}"#, r#"{"results":null}"#, r#"{"results":{}}"#, "[]"] {
            let result = parse(raw, &ImageSettings::default());
            assert!(
                matches!(result, Err(MovieError::ParseError { .. })),
                "{:?} should fail with ParseError",
                raw
            );
        }
    }

    #[test]
    fn test_parse_empty_results() {
        let movies = parse(r#"{"results":[]}"#, &ImageSettings::default()).unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn test_custom_image_settings() {
        let images = ImageSettings::new("https://cdn.example.com/img/", "w500");
        assert_eq!(images.poster_url("/a.jpg"), "https://cdn.example.com/img/w500/a.jpg");
    }
}
