//! Page cursor over the most recent result list.
//!
//! A [`Pager`] is a plain value: every transition consumes the old cursor and
//! returns the new one, so callers keep it in whatever session scope they own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ris_core::types::ScoredResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
    Stay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pager {
    results: Option<Arc<Vec<ScoredResult>>>,
    page: usize,
    page_size: usize,
}

impl Pager {
    /// An idle cursor. A zero page size is raised to one.
    pub fn new(page_size: usize) -> Self { Self { results: None, page: 0, page_size: page_size.max(1) } }

    /// Replaces the result list and rewinds to the first page. An empty list is a valid state.
    #[must_use]
    pub fn new_search(self, results: Vec<ScoredResult>) -> Self { Self { results: Some(Arc::new(results)), page: 0, page_size: self.page_size } }

    #[must_use]
    pub fn next(mut self) -> Self {
        if self.has_next() {
            self.page += 1;
        }
        self
    }

    #[must_use]
    pub fn prev(mut self) -> Self {
        if self.has_prev() {
            self.page -= 1;
        }
        self
    }

    #[must_use]
    pub fn turn(self, direction: Direction) -> Self {
        match direction {
            Direction::Next => self.next(),
            Direction::Prev => self.prev(),
            Direction::Stay => self,
        }
    }

    pub fn has_next(&self) -> bool { (self.page + 1) * self.page_size < self.total() }

    pub fn has_prev(&self) -> bool { self.page > 0 }

    pub fn is_active(&self) -> bool { self.results.is_some() }

    pub fn page_index(&self) -> usize { self.page }

    pub fn page_size(&self) -> usize { self.page_size }

    pub fn total(&self) -> usize { self.results.as_ref().map_or(0, |r| r.len()) }

    pub fn page_count(&self) -> usize { self.total().div_ceil(self.page_size) }

    pub fn results(&self) -> &[ScoredResult] { self.results.as_deref().map_or(&[], Vec::as_slice) }

    /// Items on the current page.
    pub fn current_page(&self) -> &[ScoredResult] {
        let results = self.results();
        let start = (self.page * self.page_size).min(results.len());
        let end = (start + self.page_size).min(results.len());
        &results[start..end]
    }

    pub fn view(&self) -> PageView {
        PageView {
            items: self.current_page().to_vec(),
            page: self.page,
            page_count: self.page_count(),
            total: self.total(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }
}

/// Moves `cursor` in `direction` and returns the page it lands on with the new cursor.
pub fn page(cursor: Pager, direction: Direction) -> (Vec<ScoredResult>, Pager) {
    let cursor = cursor.turn(direction);
    (cursor.current_page().to_vec(), cursor)
}

/// One rendered page plus enough cursor state to draw navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub items: Vec<ScoredResult>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}
