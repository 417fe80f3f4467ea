use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use ris_core::config::resolve_with_base;
use ris_core::traits::ImageLoader;

/// Reads product images from disk. Relative references resolve against `base`.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    base: PathBuf,
}

impl FsImageLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self { Self { base: base.into() } }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, reference: &str) -> Result<Vec<u8>> {
        let reference = reference.trim();
        if reference.is_empty() {
            bail!("empty image reference");
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            bail!("remote image references are not supported: {reference}");
        }
        let path = resolve_with_base(&self.base, reference);
        std::fs::read(&path).with_context(|| format!("reading image {}", path.display()))
    }
}
