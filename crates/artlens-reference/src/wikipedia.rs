//! Wikipedia REST page-summary client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use artlens_core::{EncyclopediaSource, ReferenceSummary, Result};

use crate::http::{self, non_empty};
use crate::names::WIKIPEDIA;

/// Encyclopedia lookups via `/api/rest_v1/page/summary/{title}`.
pub struct WikipediaSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    title: String,
    description: Option<String>,
    #[serde(default)]
    extract: String,
    content_urls: Option<ContentUrls>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: Option<String>,
}

impl WikipediaSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.to_string(),
        })
    }

    /// Article titles use underscores for spaces.
    fn title_segment(term: &str) -> String {
        let title = term.trim().replace(' ', "_");
        urlencoding::encode(&title).into_owned()
    }

    fn into_summary(page: PageSummary) -> Option<ReferenceSummary> {
        if page.page_type == "disambiguation" || page.extract.trim().is_empty() {
            return None;
        }
        Some(ReferenceSummary {
            source: WIKIPEDIA.to_string(),
            title: page.title,
            description: non_empty(page.description),
            extract: page.extract.trim().to_string(),
            url: page.content_urls.and_then(|c| c.desktop).and_then(|d| d.page),
            thumbnail: page.thumbnail.and_then(|t| t.source),
        })
    }
}

#[async_trait]
impl EncyclopediaSource for WikipediaSource {
    fn name(&self) -> &str {
        WIKIPEDIA
    }

    async fn summary(&self, term: &str) -> Result<Option<ReferenceSummary>> {
        let url = http::join_url(
            &self.base_url,
            &format!("/api/rest_v1/page/summary/{}", Self::title_segment(term)),
        );
        let page: Option<PageSummary> =
            http::get_json(WIKIPEDIA, self.client.get(&url)).await?;

        let summary = page.and_then(Self::into_summary);
        debug!(
            provider = WIKIPEDIA,
            term,
            found = summary.is_some(),
            "Encyclopedia lookup"
        );
        Ok(summary)
    }
}
