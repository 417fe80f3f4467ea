//! Exact in-process index: cosine similarity over every stored vector.

use anyhow::{ensure, Result};

use ris_core::filter::Filter;
use ris_core::traits::{Query, QueryRequest, VectorIndex};
use ris_core::types::{Modality, ScoredResult};

use crate::fusion::reciprocal_rank_fusion;
use crate::IndexedItem;

fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    (na > 0.0 && nb > 0.0).then(|| dot / (na * nb))
}

#[derive(Debug, Clone)]
pub struct MemoryIndex {
    items: Vec<IndexedItem>,
    rrf_k: f64,
}

impl MemoryIndex {
    pub fn new(items: Vec<IndexedItem>, rrf_k: f64) -> Self { Self { items, rrf_k } }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Items carrying a `using` vector that pass `filter`, best first. Ties keep insertion order.
    fn nearest(&self, using: Modality, vector: &[f32], filter: &Filter, limit: usize) -> Result<Vec<ScoredResult>> {
        let mut scored = Vec::new();
        for item in &self.items {
            let Some(stored) = item.vector(using) else { continue };
            ensure!(stored.len() == vector.len(), "{} query has {} dims, index holds {}", using, vector.len(), stored.len());
            if !filter.matches(|key| item.field(key)) {
                continue;
            }
            if let Some(score) = cosine(stored, vector) {
                scored.push((item, score));
            }
        }
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);
        Ok(scored.into_iter().map(|(item, score)| ScoredResult::scored(item.payload.clone(), score)).collect())
    }
}

impl VectorIndex for MemoryIndex {
    fn query(&self, request: &QueryRequest) -> Result<Vec<ScoredResult>> {
        match &request.query {
            Query::Nearest { using, vector } => self.nearest(*using, vector, &request.filter, request.limit),
            Query::Fusion(_) => {
                let lists = request
                    .prefetch
                    .iter()
                    .map(|p| self.nearest(p.using, &p.vector, &request.filter, p.limit))
                    .collect::<Result<Vec<_>>>()?;
                Ok(reciprocal_rank_fusion(lists, self.rrf_k, request.limit))
            }
        }
    }
}
