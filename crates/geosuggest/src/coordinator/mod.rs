//! The per-widget search coordinator.
//!
//! [`SearchCoordinator`] turns a rapidly changing stream of search-field edits into a
//! debounced, latest-wins sequence of geocoding requests and reconciles their out-of-order
//! completions into one authoritative suggestion list.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use geosuggest::{CoordinatorConfig, GeocodingClient, SearchCoordinator};
//!
//! # async fn demo(client: Arc<dyn GeocodingClient>) -> Result<(), geosuggest::error::GeosuggestError> {
//! let coordinator = SearchCoordinator::builder(client)
//!     .config(CoordinatorConfig::builder().min_query_length(2).build())
//!     .build();
//!
//! let mut suggestions = coordinator.subscribe_suggestions();
//! coordinator.on_panel_active_changed(true);
//! coordinator.on_query_changed("paris");
//!
//! suggestions.changed().await.ok();
//! let picked = suggestions.borrow().first().cloned();
//! if let Some(feature) = picked {
//!     let resolved = coordinator.on_feature_selected(feature).await?;
//!     println!("Selected {resolved} at {:?}", resolved.center());
//! }
//! # Ok(())
//! # }
//! ```

mod pipeline;

use std::{fmt, sync::Arc};

use geosuggest_model::Feature;
use tokio::sync::watch;
use tracing::{debug, error, instrument};

pub use self::pipeline::ErrorHook;
use self::pipeline::Shared;
use crate::{
    client::GeocodingClient,
    config::CoordinatorConfig,
    detail::DetailResolver,
    error::{CoordinatorError, DetailLookupError},
    query::{Query, QueryTicket},
    state::{CoordinatorState, StateStore, Suggestions},
};

/// Owns the query/result state machine of one autocomplete widget.
///
/// Must be created inside a Tokio runtime. Dropping it (unmounting the widget) stops the
/// pipeline; requests already in flight run to completion and are then ignored.
pub struct SearchCoordinator {
    shared: Arc<Shared>,
    tickets: watch::Sender<QueryTicket>,
    resolver: DetailResolver,
}

impl fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("shared", &self.shared)
            .field("ticket", &*self.tickets.borrow())
            .finish_non_exhaustive()
    }
}

impl SearchCoordinator {
    /// A coordinator with the default configuration and error hook.
    pub fn new(client: Arc<dyn GeocodingClient>) -> Self {
        Self::builder(client).build()
    }

    pub fn builder(client: Arc<dyn GeocodingClient>) -> SearchCoordinatorBuilder {
        SearchCoordinatorBuilder::new(client)
    }

    /// Replaces the configuration. Takes effect from the next admitted query.
    pub fn set_configuration(&self, config: CoordinatorConfig) {
        debug!(?config, "Configuration updated");
        self.shared.config.send_replace(config);
    }

    pub fn configuration(&self) -> CoordinatorConfig {
        self.shared.config.borrow().clone()
    }

    /// Records a typed query; it is sent once typing pauses for the debounce interval.
    pub fn on_query_changed(&self, text: impl Into<String>) {
        self.submit(Query::typed(text));
    }

    /// Records an explicit submission; it is sent immediately to the search endpoint.
    pub fn on_explicit_search(&self, text: impl Into<String>) {
        self.submit(Query::explicit(text));
    }

    /// Opens or closes the suggestion panel. In-flight requests are left alone.
    pub fn on_panel_active_changed(&self, active: bool) {
        self.shared.state.set_active(active);
    }

    /// Closes the panel and resolves the picked suggestion into a complete feature.
    ///
    /// The panel is closed whether or not the resolution succeeds.
    #[instrument(name = "Feature selected", skip_all, level = "debug", fields(id = %feature.id))]
    pub async fn on_feature_selected(&self, feature: Feature) -> Result<Feature, DetailLookupError> {
        self.on_panel_active_changed(false);
        self.resolver.resolve(feature).await
    }

    pub fn state(&self) -> CoordinatorState {
        self.shared.state.snapshot()
    }

    pub fn current_query(&self) -> Query {
        self.state().current_query
    }

    pub fn suggestions(&self) -> Suggestions {
        self.state().suggestions
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    /// Number of suggestion requests that have not settled yet.
    pub fn pending_requests(&self) -> usize {
        self.shared.state.pending_requests()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<Query> {
        self.shared.state.subscribe_query()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<Suggestions> {
        self.shared.state.subscribe_suggestions()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.shared.state.subscribe_active()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.shared.state.subscribe_loading()
    }

    /// Overwrites the latest-query slot. Re-entering the current query is not a change.
    fn submit(&self, query: Query) {
        let mut generation = None;
        self.tickets.send_if_modified(|ticket| {
            if ticket.query == query {
                return false;
            }
            ticket.generation += 1;
            ticket.query = query.clone();
            generation = Some(ticket.generation);
            true
        });

        if let Some(generation) = generation {
            debug!(%query, generation, "Query changed");
            self.shared.state.set_query(query);
        }
    }
}

/// Builder for a [`SearchCoordinator`].
pub struct SearchCoordinatorBuilder {
    client: Arc<dyn GeocodingClient>,
    config: CoordinatorConfig,
    error_hook: Option<ErrorHook>,
}

impl fmt::Debug for SearchCoordinatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCoordinatorBuilder")
            .field("config", &self.config)
            .field("error_hook", &self.error_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl SearchCoordinatorBuilder {
    pub fn new(client: Arc<dyn GeocodingClient>) -> Self {
        Self {
            client,
            config: CoordinatorConfig::default(),
            error_hook: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Where pipeline failures are reported. Defaults to an `error!` log line.
    #[must_use]
    pub fn error_hook(
        mut self,
        hook: impl Fn(&CoordinatorError) + Send + Sync + 'static,
    ) -> Self {
        let hook: ErrorHook = Arc::new(hook);
        self.error_hook = Some(hook);
        self
    }

    /// Spawns the pipeline task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn build(self) -> SearchCoordinator {
        let (tickets, ticket_rx) = watch::channel(QueryTicket::default());
        let error_hook = self.error_hook.unwrap_or_else(default_error_hook);

        let shared = Arc::new(Shared {
            client: Arc::clone(&self.client),
            state: StateStore::new(),
            config: watch::Sender::new(self.config),
            tickets: ticket_rx.clone(),
            error_hook,
        });
        tokio::spawn(pipeline::run(Arc::clone(&shared), ticket_rx));

        SearchCoordinator {
            shared,
            tickets,
            resolver: DetailResolver::new(self.client),
        }
    }
}

fn default_error_hook() -> ErrorHook {
    Arc::new(|err: &CoordinatorError| {
        error!(error = %err, "Error loading autocomplete results");
    })
}
