//! Poster thumbnail URLs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterSize {
    W92,
    W154,
    W185,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
        }
    }
}

/// `<base_url>/<size><poster_path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterTemplate {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

impl Default for PosterTemplate {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl PosterTemplate {
    pub fn url(&self, poster_path: Option<&str>, size: PosterSize) -> Option<String> {
        let path = poster_path.filter(|p| !p.is_empty())?;
        Some(format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            size.as_str(),
            path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        let posters = PosterTemplate::default();
        assert_eq!(
            posters.url(Some("/abc.jpg"), PosterSize::W92).as_deref(),
            Some("https://image.tmdb.org/t/p/w92/abc.jpg")
        );
        assert_eq!(posters.url(Some(""), PosterSize::W185), None);
        assert_eq!(posters.url(None, PosterSize::W185), None);
    }
}
