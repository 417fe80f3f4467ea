mod common;

use ris_search::{Direction, ResultSource, SessionStore};

use common::{scored, skus};

#[test]
fn sessions_do_not_share_cursors() {
    let store = SessionStore::new(1);
    store.update("alice", |s| ((), s.record(ResultSource::TextSearch, vec![scored("A"), scored("B")])));
    store.update("bob", |s| ((), s.record(ResultSource::ImageSearch, vec![scored("C")])));

    let page = store.update("alice", |mut s| {
        s.pager = s.pager.turn(Direction::Next);
        (s.pager.current_page().to_vec(), s)
    });
    assert_eq!(skus(&page), ["B"]);

    let bob = store.get("bob");
    assert_eq!(bob.pager.page_index(), 0);
    assert_eq!(bob.source, Some(ResultSource::ImageSearch));
    assert_eq!(store.len(), 2);
}

#[test]
fn unknown_session_starts_idle() {
    let store = SessionStore::new(10);
    let session = store.get("nobody");
    assert!(!session.pager.is_active());
    assert!(session.source.is_none());
    assert!(store.is_empty());
}

#[test]
fn sku_hit_survives_later_searches() {
    let store = SessionStore::new(10);
    store.update("s", |s| ((), s.record(ResultSource::SkuLookup, vec![scored("ABC123")])));
    store.update("s", |s| ((), s.record(ResultSource::FindSimilar, vec![scored("C"), scored("B")])));

    let session = store.get("s");
    assert_eq!(skus(&session.last_sku_hit), ["ABC123"]);
    assert_eq!(session.pager.total(), 2);
    assert_eq!(session.source.map(ResultSource::label), Some("Similar products"));

    assert!(store.remove("s").is_some());
    assert!(store.is_empty());
}

#[test]
fn paging_unknown_ids_stores_nothing() {
    let store = SessionStore::new(10);
    store.update("alice", |s| ((), s.record(ResultSource::TextSearch, vec![scored("A")])));

    for i in 0..1000 {
        let session = store.turn(&format!("ghost-{i}"), Direction::Next);
        assert!(!session.pager.is_active());
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn turn_moves_a_live_cursor() {
    let store = SessionStore::new(1);
    store.update("s", |s| ((), s.record(ResultSource::TextSearch, vec![scored("A"), scored("B")])));

    let moved = store.turn("s", Direction::Next);
    assert_eq!(skus(moved.pager.current_page()), ["B"]);
    assert_eq!(store.get("s").pager.page_index(), 1);
    assert_eq!(store.turn("s", Direction::Stay).pager.page_index(), 1);
}

#[test]
fn full_store_evicts_least_recently_used() {
    let store = SessionStore::with_capacity(1, 2);
    store.update("a", |s| ((), s.record(ResultSource::TextSearch, vec![scored("A")])));
    store.update("b", |s| ((), s.record(ResultSource::TextSearch, vec![scored("B")])));
    // Paging counts as use, so "b" is now the oldest.
    store.turn("a", Direction::Stay);
    store.update("c", |s| ((), s.record(ResultSource::TextSearch, vec![scored("C")])));

    assert_eq!(store.len(), 2);
    assert!(store.remove("b").is_none());
    assert_eq!(skus(store.get("a").pager.results()), ["A"]);
    assert_eq!(skus(store.get("c").pager.results()), ["C"]);
}
