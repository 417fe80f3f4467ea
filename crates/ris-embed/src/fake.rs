//! Deterministic hashing embedders for tests and development.
//!
//! Outputs are L2-normalized, stable across runs and require no model files.

use anyhow::{ensure, Result};
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use ris_core::traits::{ImageEmbedder, TextEmbedder};

#[derive(Debug, Clone)]
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim } }

    fn accumulate<T: Hash>(&self, v: &mut [f32], token: T, position: usize) {
        let mut hasher = XxHash64::with_seed(0);
        token.hash(&mut hasher);
        let h = hasher.finish();
        let idx = (h as usize) % self.dim;
        let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        v[idx] += val + (position % 3) as f32 * 0.01;
    }

    fn finish(&self, mut v: Vec<f32>) -> Vec<f32> {
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl TextEmbedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        ensure!(!text.trim().is_empty(), "cannot embed empty text");
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.to_lowercase().split_whitespace().enumerate() {
            self.accumulate(&mut v, token, i);
        }
        Ok(self.finish(v))
    }
}

impl ImageEmbedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_image(&self, image_bytes: &[u8]) -> Result<Vec<f32>> {
        ensure!(!image_bytes.is_empty(), "cannot embed empty image");
        let mut v = vec![0f32; self.dim];
        for (i, chunk) in image_bytes.chunks(16).enumerate() {
            self.accumulate(&mut v, chunk, i);
        }
        Ok(self.finish(v))
    }
}
