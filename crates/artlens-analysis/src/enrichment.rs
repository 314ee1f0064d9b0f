//! Encyclopedia context for the art movements the synthesis named.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};

use artlens_core::defaults::MAX_ENRICHED_MOVEMENTS;
use artlens_core::{EncyclopediaSource, ReferenceSummary};

use crate::settle::settle_all;

#[derive(Clone, Default)]
pub struct Enricher {
    encyclopedia: Option<Arc<dyn EncyclopediaSource>>,
}

impl Enricher {
    pub fn new(encyclopedia: Option<Arc<dyn EncyclopediaSource>>) -> Self {
        Self { encyclopedia }
    }

    /// Look up the first movements concurrently. Missing articles and
    /// failures are dropped; successes keep movement order.
    #[instrument(skip(self), fields(
        subsystem = "analysis",
        component = "enrichment",
        op = "enrich",
    ))]
    pub async fn enrich(&self, movements: &[String]) -> Vec<ReferenceSummary> {
        let Some(encyclopedia) = &self.encyclopedia else {
            return Vec::new();
        };
        let start = Instant::now();

        let terms: Vec<&str> = movements
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .take(MAX_ENRICHED_MOVEMENTS)
            .collect();

        let results = settle_all(terms.iter().map(|term| {
            (
                encyclopedia.name().to_string(),
                "movement_context".to_string(),
                encyclopedia.summary(term),
            )
        }))
        .await;

        let context: Vec<ReferenceSummary> = results.into_iter().flatten().flatten().collect();
        debug!(
            requested = terms.len(),
            result_count = context.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Movement enrichment complete"
        );
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artlens_reference::mock::MockEncyclopedia;

    fn movements(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_enrich_caps_and_keeps_order() {
        let encyclopedia = MockEncyclopedia::new()
            .with_article("Impressionism", "Impressionism is a movement.")
            .with_article("Realism", "Realism is a movement.")
            .with_article("Cubism", "Cubism is a movement.");
        let enricher = Enricher::new(Some(Arc::new(encyclopedia.clone())));

        let context = enricher
            .enrich(&movements(&["Realism", "Impressionism", "Cubism"]))
            .await;
        let titles: Vec<&str> = context.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Realism", "Impressionism"]);
        assert_eq!(encyclopedia.lookups().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_and_failing_lookups_dropped() {
        let sparse = Enricher::new(Some(Arc::new(
            MockEncyclopedia::new().with_article("Realism", "Realism is a movement."),
        )));
        let context = sparse.enrich(&movements(&["Unknownism", "Realism"])).await;
        assert_eq!(context.len(), 1);

        let failing = Enricher::new(Some(Arc::new(MockEncyclopedia::new().failing())));
        assert!(failing.enrich(&movements(&["Realism"])).await.is_empty());
    }

    #[tokio::test]
    async fn test_without_encyclopedia() {
        assert!(Enricher::default()
            .enrich(&movements(&["Realism"]))
            .await
            .is_empty());
    }
}
