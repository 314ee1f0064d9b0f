//! Harvard Art Museums API. Requires an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use artlens_core::{ArtworkRecord, CollectionSource, Error, Result};

use crate::http::{self, non_empty};
use crate::names::HARVARD;

pub struct HarvardSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    #[serde(default)]
    records: Vec<HarvardObject>,
}

#[derive(Debug, Deserialize)]
struct HarvardObject {
    title: Option<String>,
    #[serde(default)]
    people: Vec<Person>,
    dated: Option<String>,
    medium: Option<String>,
    primaryimageurl: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: Option<String>,
}

impl HarvardSource {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    fn into_records(response: ObjectResponse) -> Vec<ArtworkRecord> {
        response
            .records
            .into_iter()
            .filter_map(|obj| {
                Some(ArtworkRecord {
                    source: HARVARD.to_string(),
                    title: non_empty(obj.title)?,
                    artist: obj.people.into_iter().find_map(|p| non_empty(p.name)),
                    date: non_empty(obj.dated),
                    medium: non_empty(obj.medium),
                    image_url: non_empty(obj.primaryimageurl),
                    url: non_empty(obj.url),
                })
            })
            .collect()
    }
}

#[async_trait]
impl CollectionSource for HarvardSource {
    fn name(&self) -> &str {
        HARVARD
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ArtworkRecord>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::ProviderUnavailable(format!("{}: HARVARD_API_KEY not set", HARVARD))
        })?;

        let url = http::join_url(&self.base_url, "/object");
        let size = limit.to_string();
        let request = self.client.get(&url).query(&[
            ("apikey", api_key),
            ("keyword", term),
            ("size", size.as_str()),
            ("hasimage", "1"),
        ]);

        let records = http::get_json::<ObjectResponse>(HARVARD, request)
            .await?
            .map(Self::into_records)
            .unwrap_or_default();
        debug!(provider = HARVARD, term, result_count = records.len(), "Collection search");
        Ok(records)
    }
}
