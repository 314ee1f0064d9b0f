//! Mock encyclopedia and collection sources for deterministic testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use artlens_core::{
    ArtworkRecord, CollectionSource, EncyclopediaSource, Error, ReferenceSummary, Result,
};

use crate::names;

/// Encyclopedia mock keyed by lowercase term.
#[derive(Clone, Default)]
pub struct MockEncyclopedia {
    articles: HashMap<String, ReferenceSummary>,
    fail: bool,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an article whose extract is `extract`.
    pub fn with_article(mut self, term: &str, extract: &str) -> Self {
        self.articles.insert(
            term.to_lowercase(),
            ReferenceSummary {
                source: names::WIKIPEDIA.to_string(),
                title: term.to_string(),
                description: None,
                extract: extract.to_string(),
                url: Some(format!("https://en.wikipedia.org/wiki/{}", term.replace(' ', "_"))),
                thumbnail: None,
            },
        );
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Terms looked up, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncyclopediaSource for MockEncyclopedia {
    fn name(&self) -> &str {
        names::WIKIPEDIA
    }

    async fn summary(&self, term: &str) -> Result<Option<ReferenceSummary>> {
        self.lookups.lock().unwrap().push(term.to_string());
        if self.fail {
            return Err(Error::ProviderUnavailable("mock encyclopedia failure".to_string()));
        }
        Ok(self.articles.get(&term.to_lowercase()).cloned())
    }
}

/// Collection mock returning canned records per term.
#[derive(Clone)]
pub struct MockCollection {
    name: String,
    requires_credential: bool,
    configured: bool,
    by_term: HashMap<String, Vec<ArtworkRecord>>,
    fallback: Vec<ArtworkRecord>,
    fail: bool,
    searches: Arc<Mutex<Vec<String>>>,
}

impl MockCollection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            requires_credential: false,
            configured: true,
            by_term: HashMap::new(),
            fallback: Vec::new(),
            fail: false,
            searches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records returned for any term without a specific entry.
    pub fn with_records(mut self, titles: &[(&str, &str)]) -> Self {
        self.fallback = Self::records(&self.name, titles);
        self
    }

    pub fn with_term_records(mut self, term: &str, titles: &[(&str, &str)]) -> Self {
        let records = Self::records(&self.name, titles);
        self.by_term.insert(term.to_lowercase(), records);
        self
    }

    /// Credentialed source; `configured` says whether the key is present.
    pub fn credentialed(mut self, configured: bool) -> Self {
        self.requires_credential = true;
        self.configured = configured;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    fn records(source: &str, titles: &[(&str, &str)]) -> Vec<ArtworkRecord> {
        titles
            .iter()
            .map(|(title, artist)| ArtworkRecord {
                source: source.to_string(),
                title: title.to_string(),
                artist: Some(artist.to_string()),
                date: None,
                medium: None,
                image_url: None,
                url: None,
            })
            .collect()
    }
}

#[async_trait]
impl CollectionSource for MockCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires_credential(&self) -> bool {
        self.requires_credential
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ArtworkRecord>> {
        self.searches.lock().unwrap().push(term.to_string());
        if self.fail {
            return Err(Error::ProviderUnavailable(format!("{}: mock failure", self.name)));
        }
        let records = self
            .by_term
            .get(&term.to_lowercase())
            .unwrap_or(&self.fallback);
        Ok(records.iter().take(limit).cloned().collect())
    }
}
