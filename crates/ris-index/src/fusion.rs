use std::collections::HashMap;

use ris_core::types::ScoredResult;

/// Smoothing constant used when none is configured.
pub const DEFAULT_RRF_K: f64 = 60.0;

fn identity(result: &ScoredResult) -> String {
    match result.sku() {
        Some(sku) => sku.to_string(),
        None => serde_json::Value::Object(result.payload.clone()).to_string(),
    }
}

/// Fuse ranked lists with Reciprocal Rank Fusion.
///
/// Each item scores `sum(1 / (k + rank))` over the lists it appears in, with
/// 1-based ranks. The output is ordered by fused score, ties keep the order in
/// which items were first seen, and is truncated to `limit`.
pub fn reciprocal_rank_fusion(lists: Vec<Vec<ScoredResult>>, k: f64, limit: usize) -> Vec<ScoredResult> {
    let mut fused: Vec<(ScoredResult, f64)> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();
    for list in lists {
        for (rank, result) in list.into_iter().enumerate() {
            let contribution = 1.0 / (k + (rank + 1) as f64);
            let key = identity(&result);
            match position.get(&key) {
                Some(&i) => fused[i].1 += contribution,
                None => {
                    position.insert(key, fused.len());
                    fused.push((result, contribution));
                }
            }
        }
    }
    fused.sort_by(|a, b| b.1.total_cmp(&a.1));
    fused.truncate(limit);
    fused
        .into_iter()
        .map(|(result, score)| ScoredResult { payload: result.payload, score: Some(score as f32) })
        .collect()
}
