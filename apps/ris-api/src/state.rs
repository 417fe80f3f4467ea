//! Application state for the search API

use std::sync::Arc;

use anyhow::Result;

use ris_core::color::ColorPick;
use ris_core::config::{SearchSettings, Settings};
use ris_search::bootstrap::build_service;
use ris_search::{FacetFilters, SearchService, SessionStore};

use crate::error::ApiError;
use crate::models::{selections, SearchOptions};

pub struct AppState {
    pub service: SearchService,
    pub sessions: SessionStore,
    pub search: SearchSettings,
}

impl AppState {
    pub fn new(service: SearchService, search: SearchSettings) -> Self {
        let sessions = SessionStore::with_capacity(search.page_size, search.max_sessions);
        Self { service, sessions, search }
    }

    /// Builds the service from configuration. Blocking: loads the catalog and models.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        tracing::info!("Initializing search service...");
        let service = build_service(settings)?;
        Ok(Self::new(service, settings.search.clone()))
    }

    /// Requested result cap, or the configured default.
    pub fn top_k(&self, requested: Option<usize>) -> Result<usize, ApiError> {
        let top_k = requested.unwrap_or(self.search.default_top_k);
        if top_k > self.search.max_top_k {
            return Err(ApiError::InvalidRequest(format!("top_k {top_k} exceeds the maximum of {}", self.search.max_top_k)));
        }
        Ok(top_k)
    }

    pub fn facet_filters(&self, options: SearchOptions) -> FacetFilters {
        let mut filters = FacetFilters::new(selections(options.filters));
        if let Some(color) = options.color {
            filters = filters.with_color(ColorPick::new(color.hex, color.tolerance.unwrap_or(self.search.default_color_tolerance)));
        }
        filters
    }
}

/// Runs blocking search work off the async executor.
pub async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state)).await.map_err(|e| ApiError::Internal(e.into()))?
}
