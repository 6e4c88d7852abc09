//! Source factory for dependency injection.

use std::str::FromStr;
use std::sync::Arc;

use super::{FilmSource, SourceResult};
use crate::config::ApiSettings;

/// Source type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// REST backend
    #[default]
    Http,
    /// In-memory dataset
    Local,
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "api" => Ok(Self::Http),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

/// Creates [`FilmSource`] instances from runtime configuration.
pub struct SourceFactory;

impl SourceFactory {
    pub fn create(source_type: SourceType, api: &ApiSettings) -> SourceResult<Arc<dyn FilmSource>> {
        match source_type {
            SourceType::Http => {
                #[cfg(feature = "http-source")]
                {
                    let source = super::HttpFilmSource::new(api)?;
                    Ok(Arc::new(source) as Arc<dyn FilmSource>)
                }
                #[cfg(not(feature = "http-source"))]
                {
                    let _ = api;
                    Err(super::SourceError::Configuration(
                        "HTTP source feature not enabled".to_string(),
                    ))
                }
            }
            SourceType::Local => {
                #[cfg(feature = "local-source")]
                {
                    Ok(Arc::new(super::LocalFilmSource::new()) as Arc<dyn FilmSource>)
                }
                #[cfg(not(feature = "local-source"))]
                {
                    Err(super::SourceError::Configuration(
                        "Local source feature not enabled".to_string(),
                    ))
                }
            }
        }
    }
}
