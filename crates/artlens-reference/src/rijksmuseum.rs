//! Rijksmuseum collection API. Requires an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use artlens_core::{ArtworkRecord, CollectionSource, Error, Result};

use crate::http::{self, non_empty};
use crate::names::RIJKSMUSEUM;

pub struct RijksmuseumSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionResponse {
    #[serde(default)]
    art_objects: Vec<ArtObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtObject {
    title: Option<String>,
    principal_or_first_maker: Option<String>,
    long_title: Option<String>,
    web_image: Option<WebImage>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct WebImage {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Links {
    web: Option<String>,
}

impl RijksmuseumSource {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    /// Long titles end with the date: "The Night Watch, Rembrandt van Rijn, 1642".
    fn date_from_long_title(long_title: &str) -> Option<String> {
        let tail = long_title.rsplit(',').next()?.trim();
        tail.chars()
            .any(|c| c.is_ascii_digit())
            .then(|| tail.to_string())
    }

    fn into_records(response: CollectionResponse) -> Vec<ArtworkRecord> {
        response
            .art_objects
            .into_iter()
            .filter_map(|obj| {
                Some(ArtworkRecord {
                    source: RIJKSMUSEUM.to_string(),
                    title: non_empty(obj.title)?,
                    artist: non_empty(obj.principal_or_first_maker),
                    date: obj
                        .long_title
                        .as_deref()
                        .and_then(Self::date_from_long_title),
                    medium: None,
                    image_url: obj.web_image.and_then(|w| non_empty(w.url)),
                    url: obj.links.and_then(|l| non_empty(l.web)),
                })
            })
            .collect()
    }
}

#[async_trait]
impl CollectionSource for RijksmuseumSource {
    fn name(&self) -> &str {
        RIJKSMUSEUM
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ArtworkRecord>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::ProviderUnavailable(format!("{}: RIJKSMUSEUM_API_KEY not set", RIJKSMUSEUM))
        })?;

        let url = http::join_url(&self.base_url, "/api/en/collection");
        let page_size = limit.to_string();
        let request = self.client.get(&url).query(&[
            ("key", api_key),
            ("q", term),
            ("ps", page_size.as_str()),
            ("imgonly", "true"),
        ]);

        let records = http::get_json::<CollectionResponse>(RIJKSMUSEUM, request)
            .await?
            .map(Self::into_records)
            .unwrap_or_default();
        debug!(provider = RIJKSMUSEUM, term, result_count = records.len(), "Collection search");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_long_title() {
        assert_eq!(
            RijksmuseumSource::date_from_long_title("The Night Watch, Rembrandt van Rijn, 1642"),
            Some("1642".to_string())
        );
        assert_eq!(RijksmuseumSource::date_from_long_title("Untitled"), None);
    }

    #[test]
    fn test_into_records() {
        let response: CollectionResponse = serde_json::from_str(
            r#"{"count": 1, "artObjects": [{
                "objectNumber": "SK-C-5",
                "title": "The Night Watch",
                "principalOrFirstMaker": "Rembrandt van Rijn",
                "longTitle": "The Night Watch, Rembrandt van Rijn, 1642",
                "webImage": {"url": "https://lh3.googleusercontent.com/nightwatch"},
                "links": {"web": "http://www.rijksmuseum.nl/en/collection/SK-C-5"}
            }]}"#,
        )
        .unwrap();
        let records = RijksmuseumSource::into_records(response);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date.as_deref(), Some("1642"));
        assert_eq!(records[0].source, "rijksmuseum");
    }
}
