//! Vector index backends for the product catalog.
//!
//! Both backends answer [`QueryRequest`](ris_core::traits::QueryRequest)s:
//! a nearest-neighbour query on one named vector, or per-modality prefetches
//! fused with Reciprocal Rank Fusion.

pub mod fusion;
pub mod ingest;
pub mod lance;
pub mod memory;
pub mod predicate;
pub mod schema;

use ris_core::types::Payload;

pub use fusion::{reciprocal_rank_fusion, DEFAULT_RRF_K};
pub use lance::LanceIndex;
pub use memory::MemoryIndex;

/// One catalog item as stored in an index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedItem {
    pub payload: Payload,
    pub image: Option<Vec<f32>>,
    pub text: Option<Vec<f32>>,
}

impl IndexedItem {
    pub fn vector(&self, modality: ris_core::types::Modality) -> Option<&[f32]> {
        match modality {
            ris_core::types::Modality::Image => self.image.as_deref(),
            ris_core::types::Modality::Text => self.text.as_deref(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> { self.payload.get(key).and_then(|v| v.as_str()) }
}
