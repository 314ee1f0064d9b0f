//! Settle-all combinators for optional provider calls.
//!
//! A settled call never propagates its error: failures are logged at WARN
//! with the provider name and become `None`, so a single slow or broken
//! provider cannot fail the request.

use std::future::Future;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, warn};

use artlens_core::Result;

/// Await one provider call, converting failure into `None`.
pub async fn settle<T, F>(provider: &str, slot: &str, call: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    match call.await {
        Ok(value) => {
            debug!(
                provider,
                slot,
                duration_ms = start.elapsed().as_millis() as u64,
                success = true,
                "Provider call settled"
            );
            Some(value)
        }
        Err(e) => {
            warn!(
                provider,
                slot,
                duration_ms = start.elapsed().as_millis() as u64,
                success = false,
                error = %e,
                "Provider call failed, slot left empty"
            );
            None
        }
    }
}

/// Run every call concurrently and wait for all of them; results keep
/// input order.
pub async fn settle_all<T, F, I>(calls: I) -> Vec<Option<T>>
where
    I: IntoIterator<Item = (String, String, F)>,
    F: Future<Output = Result<T>>,
{
    join_all(
        calls
            .into_iter()
            .map(|(provider, slot, call)| async move { settle(&provider, &slot, call).await }),
    )
    .await
}
