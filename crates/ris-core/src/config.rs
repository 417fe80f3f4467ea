//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_INDEX__BACKEND=memory`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::color::ColorFallback;
use crate::error::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub index: IndexSettings,
    pub search: SearchSettings,
    pub embedding: EmbeddingSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub path: String,
    pub images_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    Memory,
    Lance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub backend: IndexBackend,
    pub uri: String,
    pub table: String,
    pub rrf_k: f64,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub image: usize,
    pub text: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub page_size: usize,
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub default_color_tolerance: f64,
    pub color_fallback: ColorFallback,
    /// Live sessions kept before the least recently used is evicted.
    pub max_sessions: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub fake: bool,
    pub text_model_dir: Option<String>,
    pub image_model_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for CatalogSettings {
    fn default() -> Self { Self { path: "data/products.csv".to_string(), images_dir: "data/images".to_string() } }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            backend: IndexBackend::Lance,
            uri: "data/indexes/lancedb".to_string(),
            table: "products".to_string(),
            rrf_k: 60.0,
            dimensions: Dimensions::default(),
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self { Self { image: 512, text: 1024 } }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            default_top_k: 5,
            max_top_k: 100,
            default_color_tolerance: 50.0,
            color_fallback: ColorFallback::Disable,
            max_sessions: 1024,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self { Self { host: "0.0.0.0".to_string(), port: 8000 } }
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        let s = &self.search;
        if s.page_size == 0 {
            return Err(Error::InvalidConfig("search.page_size must be positive".into()));
        }
        if s.max_sessions == 0 {
            return Err(Error::InvalidConfig("search.max_sessions must be positive".into()));
        }
        if s.default_top_k == 0 || s.default_top_k > s.max_top_k {
            return Err(Error::InvalidConfig(format!(
                "search.default_top_k ({}) must be in 1..={}",
                s.default_top_k, s.max_top_k
            )));
        }
        if !s.default_color_tolerance.is_finite() || s.default_color_tolerance < 0.0 {
            return Err(Error::InvalidConfig("search.default_color_tolerance must be non-negative".into()));
        }
        let d = &self.index.dimensions;
        if d.image == 0 || d.text == 0 {
            return Err(Error::InvalidConfig("index.dimensions must be positive".into()));
        }
        if !(self.index.rrf_k.is_finite() && self.index.rrf_k > 0.0) {
            return Err(Error::InvalidConfig("index.rrf_k must be positive".into()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Wrap an explicit figment, e.g. one built in tests.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed, validated settings.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
