//! HTTP handlers for the search API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use ris_core::filter::FACET_FIELDS;
use ris_core::types::ScoredResult;
use ris_search::{ResultSource, SearchMode, SearchQuery, SearchSession};

use crate::error::ApiError;
use crate::models::*;
use crate::state::{blocking, AppState};

fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    // Accept data URLs as sent by browsers.
    let raw = encoded.split_once(";base64,").map_or(encoded, |(_, data)| data);
    BASE64.decode(raw.trim()).map_err(|e| ApiError::InvalidRequest(format!("Invalid image base64: {e}")))
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Nearest neighbours of a caller-supplied vector
pub async fn vector_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VectorSearchRequest>,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    let top_k = state.top_k(req.options.top_k)?;
    let filters = state.facet_filters(req.options);
    let hits = blocking(&state, move |s| Ok(s.service.search_single(req.vector, req.using, top_k, &filters)?)).await?;
    Ok(Json(hits))
}

pub async fn text_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextSearchRequest>,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    let top_k = state.top_k(req.options.top_k)?;
    let filters = state.facet_filters(req.options);
    let query = SearchQuery::text(req.text);
    let hits = blocking(&state, move |s| Ok(s.service.search(&query, top_k, &filters)?)).await?;
    Ok(Json(hits))
}

pub async fn image_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImageSearchRequest>,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    let top_k = state.top_k(req.options.top_k)?;
    let query = SearchQuery::image(decode_image(&req.image_base64)?);
    let filters = state.facet_filters(req.options);
    let hits = blocking(&state, move |s| Ok(s.service.search(&query, top_k, &filters)?)).await?;
    Ok(Json(hits))
}

pub async fn hybrid_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HybridSearchRequest>,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    let top_k = state.top_k(req.options.top_k)?;
    let image = req.image_base64.as_deref().map(decode_image).transpose()?;
    let query = SearchQuery { mode: SearchMode::Hybrid, image, text: req.text };
    let filters = state.facet_filters(req.options);
    let hits = blocking(&state, move |s| Ok(s.service.search(&query, top_k, &filters)?)).await?;
    Ok(Json(hits))
}

/// Exact SKU lookup; no match is an empty list
pub async fn get_sku(State(state): State<Arc<AppState>>, Path(sku): Path<String>) -> Json<Vec<ScoredResult>> {
    Json(state.service.lookup_sku(&sku))
}

/// Option lists for every facet field
pub async fn facets(State(state): State<Arc<AppState>>) -> Json<FacetsResponse> {
    let mut options = state.service.catalog().facet_options();
    let fields = FACET_FIELDS
        .iter()
        .map(|(field, label)| FacetField {
            field: (*field).to_string(),
            label: (*label).to_string(),
            options: options.remove(*field).unwrap_or_default(),
        })
        .collect();
    Json(FacetsResponse { fields, default_color_tolerance: state.search.default_color_tolerance })
}

fn session_page(session: &SearchSession) -> SessionPage {
    SessionPage { source: session.source, label: session.source.map(ResultSource::label), page: session.pager.view() }
}

/// Runs a search inside a session and returns its first page
pub async fn session_search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SessionSearchRequest>,
) -> Result<Json<SessionPage>, ApiError> {
    let top_k = state.top_k(req.options.top_k)?;
    let image = req.image_base64.as_deref().map(decode_image).transpose()?;
    let filters = state.facet_filters(req.options);
    let kind = req.kind;
    let (text, sku) = (req.text, req.sku);

    let page = blocking(&state, move |s| {
        let (source, results) = match kind {
            SessionSearchKind::Sku => {
                let sku = sku.ok_or_else(|| ApiError::InvalidRequest("sku is required".to_string()))?;
                (ResultSource::SkuLookup, s.service.lookup_sku(&sku))
            }
            SessionSearchKind::Similar => {
                let seed = s.sessions.get(&id).last_sku_hit;
                (ResultSource::FindSimilar, s.service.find_similar(&seed, top_k)?)
            }
            SessionSearchKind::Image => {
                let bytes = image.ok_or_else(|| ApiError::InvalidRequest("image_base64 is required".to_string()))?;
                (ResultSource::ImageSearch, s.service.search(&SearchQuery::image(bytes), top_k, &filters)?)
            }
            SessionSearchKind::Text => {
                let text = text.ok_or_else(|| ApiError::InvalidRequest("text is required".to_string()))?;
                (ResultSource::TextSearch, s.service.search(&SearchQuery::text(text), top_k, &filters)?)
            }
            SessionSearchKind::Hybrid => {
                let query = SearchQuery { mode: SearchMode::Hybrid, image, text };
                (ResultSource::HybridSearch, s.service.search(&query, top_k, &filters)?)
            }
        };
        tracing::info!(session = %id, source = source.label(), results = results.len(), "session search");
        Ok(s.sessions.update(&id, |session| {
            let session = session.record(source, results);
            (session_page(&session), session)
        }))
    })
    .await?;
    Ok(Json(page))
}

/// Moves a session's page cursor
pub async fn session_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PageRequest>,
) -> Json<SessionPage> {
    Json(session_page(&state.sessions.turn(&id, req.direction)))
}

/// Forgets a session and its results
pub async fn end_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    match state.sessions.remove(&id) {
        Some(_) => {
            tracing::info!(session = %id, "session ended");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ris_core::Error::NotFound(format!("session {id}")).into()),
    }
}
