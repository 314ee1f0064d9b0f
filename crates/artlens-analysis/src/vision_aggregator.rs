//! Fan-out to every configured vision provider and merge the answers.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use artlens_core::{AggregatedVision, ImageInput, VisionObservation, VisionProvider};

use crate::settle::settle_all;

/// Issues all configured providers concurrently and merges in
/// registration order.
#[derive(Clone, Default)]
pub struct VisionAggregator {
    providers: Vec<Arc<dyn VisionProvider>>,
}

impl VisionAggregator {
    pub fn new(providers: Vec<Arc<dyn VisionProvider>>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &[Arc<dyn VisionProvider>] {
        &self.providers
    }

    /// Never fails: when every provider fails the observation is empty.
    #[instrument(skip(self, image), fields(
        subsystem = "analysis",
        component = "vision_aggregator",
        op = "aggregate",
        image_bytes = image.len(),
    ))]
    pub async fn aggregate(&self, image: &ImageInput) -> AggregatedVision {
        let start = Instant::now();
        let active: Vec<&Arc<dyn VisionProvider>> = self
            .providers
            .iter()
            .filter(|p| {
                let configured = p.is_configured();
                if !configured {
                    debug!(provider = p.name(), "Vision provider not configured, skipping");
                }
                configured
            })
            .collect();

        let results = settle_all(
            active
                .iter()
                .map(|p| (p.name().to_string(), "vision".to_string(), p.observe(image))),
        )
        .await;

        let mut observation = VisionObservation::default();
        let mut providers = Vec::new();
        for (provider, result) in active.iter().zip(results) {
            if let Some(contribution) = result {
                observation.merge(&contribution);
                providers.push(provider.name().to_string());
            }
        }

        info!(
            attempted = active.len(),
            succeeded = providers.len(),
            result_count = observation.labels.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Vision aggregation complete"
        );
        AggregatedVision {
            observation,
            providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artlens_core::ProviderObservation;
    use artlens_inference::mock::MockVisionProvider;

    fn image() -> ImageInput {
        ImageInput::from_bytes(vec![1, 2, 3], None).unwrap()
    }

    fn labels(items: &[&str]) -> ProviderObservation {
        ProviderObservation {
            labels: items.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_merge_in_registration_order() {
        let aggregator = VisionAggregator::new(vec![
            Arc::new(MockVisionProvider::new("a", labels(&["red", "blue"]))),
            Arc::new(MockVisionProvider::new("b", labels(&["blue", "green"]))),
        ]);
        let result = aggregator.aggregate(&image()).await;
        assert_eq!(result.observation.labels, vec!["red", "blue", "green"]);
        assert_eq!(result.providers, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_all_failing_yields_empty_observation() {
        let aggregator = VisionAggregator::new(vec![
            Arc::new(MockVisionProvider::failing("a")),
            Arc::new(MockVisionProvider::failing("b")),
        ]);
        let result = aggregator.aggregate(&image()).await;
        assert!(result.observation.is_empty());
        assert_eq!(result.observation.face_count, 0);
        assert!(result.providers.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_provider_not_called() {
        let skipped = MockVisionProvider::new("skipped", labels(&["x"])).unconfigured();
        let aggregator = VisionAggregator::new(vec![
            Arc::new(skipped.clone()),
            Arc::new(MockVisionProvider::new("used", labels(&["y"]))),
        ]);
        let result = aggregator.aggregate(&image()).await;
        assert_eq!(skipped.call_count(), 0);
        assert_eq!(result.observation.labels, vec!["y"]);
    }

    #[tokio::test]
    async fn test_face_counts_sum() {
        let faces = |n| ProviderObservation {
            face_count: Some(n),
            ..Default::default()
        };
        let aggregator = VisionAggregator::new(vec![
            Arc::new(MockVisionProvider::new("a", faces(2))),
            Arc::new(MockVisionProvider::failing("b")),
            Arc::new(MockVisionProvider::new("c", faces(1))),
        ]);
        let result = aggregator.aggregate(&image()).await;
        assert_eq!(result.observation.face_count, 3);
        assert_eq!(result.providers, vec!["a", "c"]);
    }
}
