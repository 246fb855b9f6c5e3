use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::SearchEndpoint;

/// The text in the search field and how it got there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    /// `true` when the user submitted the query (enter / search action) instead of typing it
    pub is_explicit_search: bool,
}

impl Query {
    /// A query produced by typing.
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_explicit_search: false,
        }
    }

    /// A query the user explicitly submitted.
    pub fn explicit(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_explicit_search: true,
        }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub const fn endpoint(&self) -> SearchEndpoint {
        SearchEndpoint::for_query(self.is_explicit_search)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_explicit_search {
            write!(f, "search {:?}", self.text)
        } else {
            write!(f, "autocomplete {:?}", self.text)
        }
    }
}

/// A query stamped with the generation it was entered at.
///
/// The generation increases by one on every accepted query change, so two tickets with equal
/// text but different generations are distinct keystroke states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTicket {
    pub query: Query,
    pub generation: u64,
}

/// One request/response round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    /// What was sent: the trimmed text and the endpoint mode
    pub query: Query,
    /// The query as it stood in the search field when the request was issued
    pub issued_against: Query,
    /// Generation of `issued_against`
    pub generation: u64,
}

impl SearchSession {
    pub fn issue(ticket: &QueryTicket) -> Self {
        Self {
            query: Query {
                text: ticket.query.trimmed().to_string(),
                is_explicit_search: ticket.query.is_explicit_search,
            },
            issued_against: ticket.query.clone(),
            generation: ticket.generation,
        }
    }

    pub const fn endpoint(&self) -> SearchEndpoint {
        self.query.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_trims_what_is_sent_but_remembers_raw_query() {
        let ticket = QueryTicket {
            query: Query::typed("  paris "),
            generation: 7,
        };
        let session = SearchSession::issue(&ticket);
        assert_eq!(session.query, Query::typed("paris"));
        assert_eq!(session.issued_against, Query::typed("  paris "));
        assert_eq!(session.generation, 7);
        assert_eq!(session.endpoint(), SearchEndpoint::Autocomplete);
    }

    #[test]
    fn test_query_equality_includes_mode() {
        assert_ne!(Query::typed("paris"), Query::explicit("paris"));
        assert_eq!(Query::explicit("paris").endpoint(), SearchEndpoint::Search);
    }
}
