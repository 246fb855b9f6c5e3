//! The seam between the coordinator and the remote geocoding service.
//!
//! Transport, authentication and endpoint selection belong to the host application; the
//! engine only needs something that can answer the three calls below.

use async_trait::async_trait;
use geosuggest_model::{LatLon, LayerId, UpstreamFeature};
use itertools::Itertools;
use thiserror::Error;

use crate::config::CoordinatorConfig;

/// Failure of a geocoding call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Parameters shared by the autocomplete and search endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Trimmed query text
    pub text: String,
    /// Biases results towards this location
    pub focus: Option<LatLon>,
    /// Comma-joined layer identifiers, e.g. `"address,poi"`
    pub layers: Option<String>,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>, config: &CoordinatorConfig) -> Self {
        Self {
            text: text.into(),
            focus: config.user_location,
            layers: config.layers_param(),
        }
    }

    pub fn focus_lat(&self) -> Option<f64> {
        self.focus.map(|f| f.lat)
    }

    pub fn focus_lon(&self) -> Option<f64> {
        self.focus.map(|f| f.lon)
    }
}

/// Joins layer identifiers into the comma separated form the API expects.
pub fn layers_param<'a>(layers: impl IntoIterator<Item = &'a LayerId>) -> String {
    layers.into_iter().map(|layer| layer.as_str()).join(",")
}

/// Which endpoint a query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEndpoint {
    /// Fast, shallow results while typing
    Autocomplete,
    /// Deeper search on explicit submission
    Search,
}

impl SearchEndpoint {
    pub const fn for_query(is_explicit_search: bool) -> Self {
        if is_explicit_search {
            Self::Search
        } else {
            Self::Autocomplete
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Autocomplete => "autocomplete",
            Self::Search => "search",
        }
    }
}

/// A geocoding service.
///
/// Implementations must be cheap to share; the coordinator keeps one behind an `Arc` and
/// may have several calls outstanding at once.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Shallow type-ahead lookup. Results may lack geometry.
    async fn autocomplete(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError>;

    /// Full search. Results always carry geometry.
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError>;

    /// Looks a single place up by its global identifier.
    async fn place_details(&self, id: &str) -> Result<Vec<UpstreamFeature>, TransportError>;

    /// Dispatches to [`Self::autocomplete`] or [`Self::search`].
    async fn query(
        &self,
        endpoint: SearchEndpoint,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError> {
        match endpoint {
            SearchEndpoint::Autocomplete => self.autocomplete(request).await,
            SearchEndpoint::Search => self.search(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_param_joins_with_commas() {
        assert_eq!(layers_param(&[LayerId::Address, LayerId::Poi]), "address,poi");
        assert_eq!(layers_param(std::iter::empty()), "");
    }

    #[test]
    fn test_request_takes_bias_and_layers_from_config() {
        let config = CoordinatorConfig::builder()
            .user_location(52.52, 13.405)
            .unwrap()
            .layers([LayerId::Locality, LayerId::Region])
            .build();

        let request = SearchRequest::new("berlin", &config);
        assert_eq!(request.focus_lat(), Some(52.52));
        assert_eq!(request.focus_lon(), Some(13.405));
        assert_eq!(request.layers.as_deref(), Some("locality,region"));

        let request = SearchRequest::new("berlin", &CoordinatorConfig::default());
        assert_eq!(request.focus, None);
        assert_eq!(request.layers, None);
    }

    #[test]
    fn test_endpoint_for_query() {
        assert_eq!(SearchEndpoint::for_query(false), SearchEndpoint::Autocomplete);
        assert_eq!(SearchEndpoint::for_query(true), SearchEndpoint::Search);
    }
}
