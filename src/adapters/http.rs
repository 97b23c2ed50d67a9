use crate::domain::model::SortCriterion;
use crate::domain::ports::{ConfigProvider, MovieSource};
use crate::utils::error::{MovieError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const API_KEY_PARAM: &str = "api_key";

/// TMDB `movie/{popular,top_rated}` client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TmdbClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.api_base_url())?;
        if base_url.cannot_be_a_base() {
            return Err(MovieError::ConfigValidationError {
                field: "api.base_url".to_string(),
                message: format!("'{}' cannot be used as a base URL", base_url),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key().to_string(),
        })
    }
}

/// The request URL with the API key masked, for logs and error messages.
fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == API_KEY_PARAM {
                (key.into_owned(), "***".to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();

    if pairs.is_empty() {
        return masked.to_string();
    }
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[async_trait]
impl MovieSource for TmdbClient {
    fn build_request_url(&self, criterion: SortCriterion) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|_| MovieError::ConfigValidationError {
                        field: "api.base_url".to_string(),
                        message: "base URL has no path".to_string(),
                    })?;
            segments
                .pop_if_empty()
                .push("movie")
                .push(criterion.endpoint_segment());
        }
        url.query_pairs_mut().append_pair(API_KEY_PARAM, &self.api_key);
        Ok(url)
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        tracing::debug!("Making API request to: {}", redacted(url));
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(MovieError::HttpStatusError {
                status: status.as_u16(),
                url: redacted(url),
            });
        }

        let body = response.text().await?;
        tracing::debug!("Received {} bytes", body.len());
        Ok(body)
    }
}
