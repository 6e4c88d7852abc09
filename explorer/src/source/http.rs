//! HTTP client for the scatter/meta backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{FilmSource, SourceError, SourceResult};
use crate::api::{BudgetSeries, MetaResponse, RatingSeries};
use crate::config::ApiSettings;
use crate::filters::FilterState;

pub const META_ENDPOINT: &str = "meta";
pub const BUDGET_ENDPOINT: &str = "scatter/budget-revenue";
pub const RATING_ENDPOINT: &str = "scatter/rating-revenue";

/// [`FilmSource`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpFilmSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFilmSource {
    pub fn new(settings: &ApiSettings) -> SourceResult<Self> {
        let mut base_url = Url::parse(&settings.base_url).map_err(|e| {
            SourceError::Configuration(format!("Invalid API base URL {}: {}", settings.base_url, e))
        })?;
        // Relative joins replace the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SourceError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> SourceResult<T> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| SourceError::Configuration(format!("Invalid endpoint {}: {}", endpoint, e)))?;
        debug!(%url, ?params, "GET");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::transport(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(endpoint, e))?;

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "Backend request failed");
            return Err(SourceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| SourceError::decode(endpoint, e))
    }
}

#[async_trait]
impl FilmSource for HttpFilmSource {
    async fn fetch_meta(&self) -> SourceResult<MetaResponse> {
        self.get_json(META_ENDPOINT, &[]).await
    }

    async fn fetch_budget_series(&self, filters: &FilterState) -> SourceResult<BudgetSeries> {
        self.get_json(BUDGET_ENDPOINT, &filters.request_params(false))
            .await
    }

    async fn fetch_rating_series(&self, filters: &FilterState) -> SourceResult<RatingSeries> {
        self.get_json(RATING_ENDPOINT, &filters.request_params(true))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let settings = ApiSettings {
            base_url: "http://localhost:8000/api".to_string(),
            ..ApiSettings::default()
        };
        let source = HttpFilmSource::new(&settings).unwrap();

        assert_eq!(source.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            source.base_url().join(BUDGET_ENDPOINT).unwrap().as_str(),
            "http://localhost:8000/api/scatter/budget-revenue"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = ApiSettings {
            base_url: "not a url".to_string(),
            ..ApiSettings::default()
        };
        assert!(matches!(
            HttpFilmSource::new(&settings),
            Err(SourceError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let settings = ApiSettings {
            // reserved port on loopback; nothing listens there
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        };
        let source = HttpFilmSource::new(&settings).unwrap();
        let err = source.fetch_meta().await.unwrap_err();

        assert!(matches!(err, SourceError::Transport { .. }), "{err}");
    }
}
