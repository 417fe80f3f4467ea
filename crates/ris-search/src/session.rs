//! Per-session search state keyed by session id.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use ris_core::types::ScoredResult;

use crate::pager::{Direction, Pager};

/// What produced the results currently held by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    ImageSearch,
    TextSearch,
    HybridSearch,
    SkuLookup,
    FindSimilar,
}

impl ResultSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::ImageSearch => "Image search",
            Self::TextSearch => "Text search",
            Self::HybridSearch => "Hybrid search",
            Self::SkuLookup => "SKU lookup",
            Self::FindSimilar => "Similar products",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSession {
    pub pager: Pager,
    pub source: Option<ResultSource>,
    /// Rows from the most recent SKU lookup, the seed for "find similar".
    pub last_sku_hit: Vec<ScoredResult>,
}

impl SearchSession {
    pub fn new(page_size: usize) -> Self { Self { pager: Pager::new(page_size), source: None, last_sku_hit: Vec::new() } }

    /// Stores a fresh result list and rewinds to its first page.
    #[must_use]
    pub fn record(self, source: ResultSource, results: Vec<ScoredResult>) -> Self {
        let last_sku_hit = if source == ResultSource::SkuLookup { results.clone() } else { self.last_sku_hit };
        Self { pager: self.pager.new_search(results), source: Some(source), last_sku_hit }
    }
}

/// Isolated [`SearchSession`]s, one per session id.
///
/// Only searches create sessions. Once `capacity` sessions are live, storing
/// a new one evicts the least recently used.
pub struct SessionStore {
    inner: Mutex<Sessions>,
    page_size: usize,
    capacity: usize,
}

#[derive(Default)]
struct Sessions {
    by_id: HashMap<String, (u64, SearchSession)>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_oldest(&mut self) {
        let oldest = self.by_id.iter().min_by_key(|(_, (used, _))| *used).map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.by_id.remove(&id);
            tracing::debug!(session = %id, "evicted least recently used session");
        }
    }
}

impl SessionStore {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(page_size: usize) -> Self { Self::with_capacity(page_size, Self::DEFAULT_CAPACITY) }

    /// A zero capacity is raised to one.
    pub fn with_capacity(page_size: usize, capacity: usize) -> Self {
        Self { inner: Mutex::new(Sessions::default()), page_size, capacity: capacity.max(1) }
    }

    /// Snapshot of a session, or a fresh one if `id` is unknown.
    pub fn get(&self, id: &str) -> SearchSession {
        self.inner.lock().by_id.get(id).map(|(_, session)| session.clone()).unwrap_or_else(|| SearchSession::new(self.page_size))
    }

    /// Applies `f` to the session for `id` and stores the state it returns.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(SearchSession) -> (R, SearchSession)) -> R {
        let mut sessions = self.inner.lock();
        let current = match sessions.by_id.remove(id) {
            Some((_, session)) => session,
            None => {
                while sessions.by_id.len() >= self.capacity {
                    sessions.evict_oldest();
                }
                SearchSession::new(self.page_size)
            }
        };
        let (out, next) = f(current);
        let used = sessions.tick();
        sessions.by_id.insert(id.to_string(), (used, next));
        out
    }

    /// Moves the cursor of a live session. Unknown ids get an idle session back and nothing is stored.
    pub fn turn(&self, id: &str, direction: Direction) -> SearchSession {
        let mut sessions = self.inner.lock();
        let used = sessions.tick();
        match sessions.by_id.get_mut(id) {
            Some((last_used, session)) => {
                *last_used = used;
                session.pager = std::mem::replace(&mut session.pager, Pager::new(self.page_size)).turn(direction);
                session.clone()
            }
            None => SearchSession::new(self.page_size),
        }
    }

    pub fn remove(&self, id: &str) -> Option<SearchSession> { self.inner.lock().by_id.remove(id).map(|(_, session)| session) }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn len(&self) -> usize { self.inner.lock().by_id.len() }

    pub fn is_empty(&self) -> bool { self.inner.lock().by_id.is_empty() }
}
