//! Local image embedding with the CLIP vision tower.

use anyhow::{anyhow, ensure, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

use ris_core::traits::ImageEmbedder;

use crate::device::select_device;
use crate::pool::l2_normalize;

pub struct ClipImageModel {
    model: ClipModel,
    image_size: usize,
    device: Device,
    dim: usize,
}

impl ClipImageModel {
    /// Load `model.safetensors` (openai/clip-vit-base-patch32 layout) from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        tracing::info!(dir = %model_dir.display(), "loading image embedding model");
        let config = ClipConfig::vit_base_patch32();
        let weights = candle_core::safetensors::load(model_dir.join("model.safetensors"), &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = ClipModel::new(vb, &config)?;
        let image_size = config.image_size;
        let mut this = Self { model, image_size, device, dim: 0 };
        // Probe the projection width once so callers can validate dimensions.
        let probe = Tensor::zeros((1, 3, image_size, image_size), DType::F32, &this.device)?;
        this.dim = this.model.get_image_features(&probe)?.dims()[1];
        tracing::info!(dim = this.dim, "image embedding model ready");
        Ok(this)
    }

    /// Decode, resize to the model's square input and scale pixels to [-1, 1].
    fn preprocess(&self, image_bytes: &[u8]) -> Result<Tensor> {
        let img = image::load_from_memory(image_bytes).map_err(|e| anyhow!("Failed to decode image: {}", e))?;
        let side = u32::try_from(self.image_size)?;
        let rgb = img.resize_to_fill(side, side, FilterType::Triangle).to_rgb8().into_raw();
        let pixels = Tensor::from_vec(rgb, (self.image_size, self.image_size, 3), &self.device)?
            .permute((2, 0, 1))?
            .to_dtype(DType::F32)?
            .affine(2.0 / 255.0, -1.0)?;
        Ok(pixels.unsqueeze(0)?)
    }
}

impl ImageEmbedder for ClipImageModel {
    fn dim(&self) -> usize { self.dim }

    fn embed_image(&self, image_bytes: &[u8]) -> Result<Vec<f32>> {
        let pixels = self.preprocess(image_bytes)?;
        let features = l2_normalize(&self.model.get_image_features(&pixels)?)?;
        let emb: Vec<f32> = features.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        ensure!(emb.len() == self.dim, "model returned {} values, expected {}", emb.len(), self.dim);
        Ok(emb)
    }
}

/// Locate the CLIP model directory: explicit setting, then `APP_IMAGE_MODEL_DIR`, then `models/clip`.
pub fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    let candidates = configured
        .map(ris_core::config::expand_path)
        .into_iter()
        .chain(std::env::var("APP_IMAGE_MODEL_DIR").ok().map(PathBuf::from))
        .chain([PathBuf::from("models/clip"), PathBuf::from("../models/clip")]);
    for dir in candidates {
        if dir.exists() {
            return Ok(dir);
        }
    }
    Err(anyhow!("Could not locate CLIP model directory"))
}
