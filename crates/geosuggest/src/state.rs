//! Observable per-widget state.
//!
//! Each field lives in its own `watch` channel so views can subscribe to exactly what they
//! render. Every write is an atomic update of a single field.

use std::sync::Arc;

use geosuggest_model::Feature;
use tokio::sync::watch;

use crate::query::Query;

/// Shared, cheaply clonable suggestion list.
pub type Suggestions = Arc<Vec<Feature>>;

/// Point-in-time copy of the coordinator's observable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorState {
    pub current_query: Query,
    pub suggestions: Suggestions,
    /// Whether the suggestion panel is open
    pub is_active: bool,
    /// Whether a suggestion request is outstanding
    pub is_loading: bool,
}

#[derive(Debug)]
pub(crate) struct StateStore {
    query: watch::Sender<Query>,
    suggestions: watch::Sender<Suggestions>,
    active: watch::Sender<bool>,
    loading: watch::Sender<bool>,
    in_flight: watch::Sender<usize>,
}

impl StateStore {
    pub(crate) fn new() -> Self {
        Self {
            query: watch::Sender::new(Query::default()),
            suggestions: watch::Sender::new(Suggestions::default()),
            active: watch::Sender::new(false),
            loading: watch::Sender::new(false),
            in_flight: watch::Sender::new(0),
        }
    }

    pub(crate) fn snapshot(&self) -> CoordinatorState {
        CoordinatorState {
            current_query: self.query.borrow().clone(),
            suggestions: Arc::clone(&self.suggestions.borrow()),
            is_active: *self.active.borrow(),
            is_loading: *self.loading.borrow(),
        }
    }

    pub(crate) fn set_query(&self, query: Query) {
        self.query.send_replace(query);
    }

    pub(crate) fn publish_suggestions(&self, features: Vec<Feature>) {
        self.suggestions.send_replace(Arc::new(features));
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active
            .send_if_modified(|current| std::mem::replace(current, active) != active);
    }

    /// Marks a request as started; loading turns on immediately.
    pub(crate) fn begin_request(&self) {
        self.in_flight.send_modify(|pending| {
            *pending += 1;
            self.loading
                .send_if_modified(|loading| !std::mem::replace(loading, true));
        });
    }

    /// Marks a request as settled; loading turns off once nothing is outstanding.
    pub(crate) fn end_request(&self) {
        self.in_flight.send_modify(|pending| {
            *pending = pending.saturating_sub(1);
            if *pending == 0 {
                self.loading
                    .send_if_modified(|loading| std::mem::replace(loading, false));
            }
        });
    }

    pub(crate) fn pending_requests(&self) -> usize {
        *self.in_flight.borrow()
    }

    pub(crate) fn subscribe_query(&self) -> watch::Receiver<Query> {
        self.query.subscribe()
    }

    pub(crate) fn subscribe_suggestions(&self) -> watch::Receiver<Suggestions> {
        self.suggestions.subscribe()
    }

    pub(crate) fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    pub(crate) fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_succeed_without_subscribers() {
        let store = StateStore::new();
        store.set_query(Query::typed("paris"));
        store.publish_suggestions(vec![Feature::new("a", "Paris", "locality")]);
        store.set_active(true);

        let state = store.snapshot();
        assert_eq!(state.current_query, Query::typed("paris"));
        assert_eq!(state.suggestions.len(), 1);
        assert!(state.is_active);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_loading_tracks_outstanding_requests() {
        let store = StateStore::new();
        let loading = store.subscribe_loading();

        store.begin_request();
        store.begin_request();
        assert!(*loading.borrow());
        assert_eq!(store.pending_requests(), 2);

        store.end_request();
        assert!(*loading.borrow(), "one request still outstanding");

        store.end_request();
        assert!(!*loading.borrow());
        assert_eq!(store.pending_requests(), 0);

        store.end_request();
        assert_eq!(store.pending_requests(), 0);
    }

    #[test]
    fn test_unchanged_active_flag_does_not_notify() {
        let store = StateStore::new();
        let mut active = store.subscribe_active();

        store.set_active(false);
        assert!(!active.has_changed().unwrap());

        store.set_active(true);
        assert!(active.has_changed().unwrap());
        assert!(*active.borrow_and_update());
    }
}
