//! # artlens-reference
//!
//! Read-only clients for the reference sources consulted during recall:
//!
//! - Wikipedia page summaries (encyclopedia)
//! - The Metropolitan Museum of Art collection API
//! - Art Institute of Chicago collection API
//! - Harvard Art Museums API (key required)
//! - Rijksmuseum collection API (key required)
//!
//! Every client implements a trait from `artlens_core` so the recall
//! dispatcher can be tested against mocks.

mod artic;
mod harvard;
mod http;
mod met;
mod rijksmuseum;
mod wikipedia;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use std::sync::Arc;

use artlens_core::{CollectionSource, MuseumConfig, Result};

pub use artic::ArtInstituteSource;
pub use harvard::HarvardSource;
pub use met::MetMuseumSource;
pub use rijksmuseum::RijksmuseumSource;
pub use wikipedia::WikipediaSource;

/// Source names, also used as recall slot keys and in analysis sources.
pub mod names {
    pub const WIKIPEDIA: &str = "wikipedia";
    pub const MET_MUSEUM: &str = "met-museum";
    pub const ART_INSTITUTE: &str = "art-institute";
    pub const HARVARD: &str = "harvard";
    pub const RIJKSMUSEUM: &str = "rijksmuseum";
}

/// Build every collection source in fixed order: Met, Art Institute,
/// Harvard, Rijksmuseum.
pub fn build_collection_sources(
    config: &MuseumConfig,
    timeout_secs: u64,
) -> Result<Vec<Arc<dyn CollectionSource>>> {
    Ok(vec![
        Arc::new(MetMuseumSource::new(&config.met_museum_url, timeout_secs)?),
        Arc::new(ArtInstituteSource::new(&config.artic_url, timeout_secs)?),
        Arc::new(HarvardSource::new(
            &config.harvard_url,
            config.harvard_api_key.clone(),
            timeout_secs,
        )?),
        Arc::new(RijksmuseumSource::new(
            &config.rijksmuseum_url,
            config.rijksmuseum_api_key.clone(),
            timeout_secs,
        )?),
    ])
}
