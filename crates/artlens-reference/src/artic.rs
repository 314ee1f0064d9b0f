//! Art Institute of Chicago public API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use artlens_core::{ArtworkRecord, CollectionSource, Result};

use crate::http::{self, non_empty};
use crate::names::ART_INSTITUTE;

const FIELDS: &str = "id,title,artist_display,date_display,medium_display,image_id";
const DEFAULT_IIIF_URL: &str = "https://www.artic.edu/iiif/2";

pub struct ArtInstituteSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Artwork>,
    config: Option<IiifConfig>,
}

#[derive(Debug, Deserialize)]
struct IiifConfig {
    iiif_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Artwork {
    id: u64,
    title: Option<String>,
    artist_display: Option<String>,
    date_display: Option<String>,
    medium_display: Option<String>,
    image_id: Option<String>,
}

impl ArtInstituteSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.to_string(),
        })
    }

    fn into_records(response: SearchResponse) -> Vec<ArtworkRecord> {
        let iiif = response
            .config
            .and_then(|c| c.iiif_url)
            .unwrap_or_else(|| DEFAULT_IIIF_URL.to_string());

        response
            .data
            .into_iter()
            .filter_map(|art| {
                let title = non_empty(art.title)?;
                Some(ArtworkRecord {
                    source: ART_INSTITUTE.to_string(),
                    title,
                    // "Claude Monet\nFrench, 1840-1926": keep the name line.
                    artist: non_empty(
                        art.artist_display
                            .and_then(|a| a.lines().next().map(str::to_string)),
                    ),
                    date: non_empty(art.date_display),
                    medium: non_empty(art.medium_display),
                    image_url: non_empty(art.image_id)
                        .map(|id| format!("{}/{}/full/843,/0/default.jpg", iiif, id)),
                    url: Some(format!("https://www.artic.edu/artworks/{}", art.id)),
                })
            })
            .collect()
    }
}

#[async_trait]
impl CollectionSource for ArtInstituteSource {
    fn name(&self) -> &str {
        ART_INSTITUTE
    }

    fn requires_credential(&self) -> bool {
        false
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ArtworkRecord>> {
        let url = http::join_url(&self.base_url, "/api/v1/artworks/search");
        let limit = limit.to_string();
        let request = self.client.get(&url).query(&[
            ("q", term),
            ("limit", limit.as_str()),
            ("fields", FIELDS),
        ]);

        let records = http::get_json::<SearchResponse>(ART_INSTITUTE, request)
            .await?
            .map(Self::into_records)
            .unwrap_or_default();
        debug!(provider = ART_INSTITUTE, term, result_count = records.len(), "Collection search");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_records_builds_iiif_url() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "data": [
                    {"id": 16568, "title": "Water Lilies", "artist_display": "Claude Monet\nFrench, 1840-1926",
                     "date_display": "1906", "medium_display": "Oil on canvas", "image_id": "3c27b499"},
                    {"id": 2, "title": null}
                ],
                "config": {"iiif_url": "https://www.artic.edu/iiif/2"}
            }"#,
        )
        .unwrap();

        let records = ArtInstituteSource::into_records(response);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].artist.as_deref(), Some("Claude Monet"));
        assert_eq!(
            records[0].image_url.as_deref(),
            Some("https://www.artic.edu/iiif/2/3c27b499/full/843,/0/default.jpg")
        );
        assert_eq!(
            records[0].url.as_deref(),
            Some("https://www.artic.edu/artworks/16568")
        );
    }
}
