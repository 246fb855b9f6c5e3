//! Rules deciding whether a completed request may still be shown.
//!
//! A response is only trustworthy if it answers the exact query (text and mode) currently in
//! the search field. Partial prefixes of a longer, newer query are not an acceptable
//! approximation. On top of the value check, the generation captured when the request was
//! issued must still be the latest: after typing `A`, `B`, `A` the first request for `A` is
//! outdated even though its text matches again.

use crate::query::{Query, QueryTicket, SearchSession};

/// `true` iff the session was issued against a different query than `current_query`.
pub fn is_stale(session: &SearchSession, current_query: &Query) -> bool {
    session.issued_against != *current_query
}

/// `true` iff a newer query state has been entered since the session was issued.
pub const fn is_superseded(session: &SearchSession, current: &QueryTicket) -> bool {
    session.generation != current.generation
}

/// Whether the session's response may replace the displayed suggestions.
pub fn is_current(session: &SearchSession, current: &QueryTicket) -> bool {
    !is_stale(session, &current.query) && !is_superseded(session, current)
}
