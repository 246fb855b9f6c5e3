//! The suggestion pipeline: debounce, admission, request, publication.
//!
//! A single long-lived task waits on the latest-query slot. Typed queries are admitted after
//! a quiet period with no further change; explicit searches are admitted at once. Each
//! admitted query either short-circuits (blank or too short) or spawns one request task.
//! Request tasks are never cancelled; when they complete, the staleness rules decide whether
//! their results replace the displayed suggestions.

use std::{fmt, sync::Arc};

use geosuggest_model::{Feature, adapt::adapt_all};
use tokio::sync::watch;
use tracing::{debug, instrument, trace};

use crate::{
    client::{GeocodingClient, SearchRequest},
    config::CoordinatorConfig,
    error::CoordinatorError,
    query::{QueryTicket, SearchSession},
    staleness,
    state::StateStore,
};

/// Receives pipeline failures. Must not block.
pub type ErrorHook = Arc<dyn Fn(&CoordinatorError) + Send + Sync>;

/// How a query left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestOutcome {
    EmptyOrShortQuery,
    Issued,
    Published(usize),
    StaleResponseDiscarded,
    Failed,
}

pub(crate) struct Shared {
    pub(crate) client: Arc<dyn GeocodingClient>,
    pub(crate) state: StateStore,
    pub(crate) config: watch::Sender<CoordinatorConfig>,
    pub(crate) tickets: watch::Receiver<QueryTicket>,
    pub(crate) error_hook: ErrorHook,
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("state", &self.state)
            .field("config", &*self.config.borrow())
            .finish_non_exhaustive()
    }
}

impl Shared {
    /// Replaces the suggestions if `session` still answers the query on screen.
    fn publish_if_current(&self, session: &SearchSession, features: Vec<Feature>) -> RequestOutcome {
        // Hold the slot while publishing so no keystroke slips between check and write.
        let current = self.tickets.borrow();
        if staleness::is_current(session, &current) {
            let count = features.len();
            self.state.publish_suggestions(features);
            RequestOutcome::Published(count)
        } else {
            debug!(
                current = %current.query,
                current_generation = current.generation,
                "Response no longer matches the search field"
            );
            RequestOutcome::StaleResponseDiscarded
        }
    }
}

/// Keeps one request counted as in flight until dropped, whichever way the request ends.
struct InFlight {
    shared: Arc<Shared>,
}

impl InFlight {
    fn begin(shared: &Arc<Shared>) -> Self {
        shared.state.begin_request();
        Self {
            shared: Arc::clone(shared),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.shared.state.end_request();
    }
}

/// Runs until the query slot's sender is dropped.
#[instrument(name = "Suggestion pipeline", skip_all, level = "debug")]
pub(crate) async fn run(shared: Arc<Shared>, mut tickets: watch::Receiver<QueryTicket>) {
    while let Some(ticket) = next_admitted(&shared, &mut tickets).await {
        let outcome = admit(&shared, ticket);
        trace!(?outcome, "Query admitted");
    }
    debug!("Query slot closed; suggestion pipeline stopped");
}

/// Waits for the next query to get through the debounce stage.
async fn next_admitted(
    shared: &Shared,
    tickets: &mut watch::Receiver<QueryTicket>,
) -> Option<QueryTicket> {
    tickets.changed().await.ok()?;
    loop {
        let ticket = tickets.borrow_and_update().clone();
        if ticket.query.is_explicit_search {
            return Some(ticket);
        }

        let quiet = shared.config.borrow().debounce_interval();
        tokio::select! {
            () = tokio::time::sleep(quiet) => return Some(ticket),
            changed = tickets.changed() => changed.ok()?,
        }
        trace!("Query changed during debounce; restarting the wait");
    }
}

fn admit(shared: &Arc<Shared>, ticket: QueryTicket) -> RequestOutcome {
    let config = shared.config.borrow().clone();

    if !config.accepts(&ticket.query.text) {
        debug!(
            query = %ticket.query,
            min_query_length = config.min_query_length,
            "Query blank or too short; clearing suggestions"
        );
        shared.state.publish_suggestions(Vec::new());
        return RequestOutcome::EmptyOrShortQuery;
    }

    let session = SearchSession::issue(&ticket);
    let request = SearchRequest::new(session.query.text.clone(), &config);
    debug!(
        query = %session.query,
        generation = session.generation,
        layers = ?request.layers,
        "Issuing suggestion request"
    );

    let in_flight = InFlight::begin(shared);
    tokio::spawn(execute(in_flight, session, request));
    RequestOutcome::Issued
}

#[instrument(
    name = "Suggestion request",
    skip_all,
    level = "debug",
    fields(
        query = %session.query.text,
        endpoint = session.endpoint().as_str(),
        generation = session.generation,
    )
)]
async fn execute(in_flight: InFlight, session: SearchSession, request: SearchRequest) {
    let shared = &in_flight.shared;
    let outcome = match shared.client.query(session.endpoint(), &request).await {
        Ok(records) => shared.publish_if_current(&session, adapt_all(records)),
        Err(source) => {
            let err = CoordinatorError::Transport {
                query: session.query.text.clone(),
                source,
            };
            (shared.error_hook)(&err);
            RequestOutcome::Failed
        }
    };
    drop(in_flight);
    debug!(?outcome, "Request settled");
}
