//! The Met collection API: keyword search, then one fetch per object.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use artlens_core::{ArtworkRecord, CollectionSource, Result};

use crate::http::{self, non_empty};
use crate::names::MET_MUSEUM;

pub struct MetMuseumSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    /// `null` when nothing matched.
    #[serde(rename = "objectIDs")]
    object_ids: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetObject {
    #[serde(rename = "objectID")]
    object_id: u64,
    #[serde(default)]
    title: String,
    artist_display_name: Option<String>,
    object_date: Option<String>,
    medium: Option<String>,
    primary_image_small: Option<String>,
    #[serde(rename = "objectURL")]
    object_url: Option<String>,
}

impl MetObject {
    fn into_record(self) -> Option<ArtworkRecord> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return None;
        }
        Some(ArtworkRecord {
            source: MET_MUSEUM.to_string(),
            title,
            artist: non_empty(self.artist_display_name),
            date: non_empty(self.object_date),
            medium: non_empty(self.medium),
            image_url: non_empty(self.primary_image_small),
            url: non_empty(self.object_url).or_else(|| {
                Some(format!(
                    "https://www.metmuseum.org/art/collection/search/{}",
                    self.object_id
                ))
            }),
        })
    }
}

impl MetMuseumSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.to_string(),
        })
    }

    async fn fetch_object(&self, id: u64) -> Result<Option<ArtworkRecord>> {
        let url = http::join_url(
            &self.base_url,
            &format!("/public/collection/v1/objects/{}", id),
        );
        let object: Option<MetObject> = http::get_json(MET_MUSEUM, self.client.get(&url)).await?;
        Ok(object.and_then(MetObject::into_record))
    }
}

#[async_trait]
impl CollectionSource for MetMuseumSource {
    fn name(&self) -> &str {
        MET_MUSEUM
    }

    fn requires_credential(&self) -> bool {
        false
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ArtworkRecord>> {
        let url = http::join_url(&self.base_url, "/public/collection/v1/search");
        let request = self
            .client
            .get(&url)
            .query(&[("q", term), ("hasImages", "true")]);

        let Some(found) = http::get_json::<SearchResponse>(MET_MUSEUM, request).await? else {
            return Ok(vec![]);
        };
        let ids: Vec<u64> = found
            .object_ids
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect();
        debug!(provider = MET_MUSEUM, term, matched = ids.len(), "Collection search");

        // Object fetches settle independently; one bad object does not sink the search.
        let fetched = join_all(ids.iter().map(|&id| self.fetch_object(id))).await;
        let mut records = Vec::with_capacity(fetched.len());
        for (id, outcome) in ids.iter().zip(fetched) {
            match outcome {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!(provider = MET_MUSEUM, object_id = id, error = %e, "Object fetch failed"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_object_ids() {
        let found: SearchResponse =
            serde_json::from_str(r#"{"total": 0, "objectIDs": null}"#).unwrap();
        assert!(found.object_ids.is_none());
    }

    #[test]
    fn test_object_into_record() {
        let object: MetObject = serde_json::from_str(
            r#"{
                "objectID": 437127,
                "title": "Bridge over a Pond of Water Lilies",
                "artistDisplayName": "Claude Monet",
                "objectDate": "1899",
                "medium": "Oil on canvas",
                "primaryImageSmall": "",
                "objectURL": "https://www.metmuseum.org/art/collection/search/437127"
            }"#,
        )
        .unwrap();
        let record = object.into_record().unwrap();
        assert_eq!(record.artist.as_deref(), Some("Claude Monet"));
        assert_eq!(record.image_url, None);
        assert_eq!(record.source, "met-museum");
    }

    #[test]
    fn test_untitled_object_dropped() {
        let object: MetObject = serde_json::from_str(r#"{"objectID": 1, "title": " "}"#).unwrap();
        assert!(object.into_record().is_none());
    }
}
