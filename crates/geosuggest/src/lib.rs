//! Geosuggest - Place Autocomplete Coordination
//!
//! Geosuggest sits between a search field and a remote geocoding API. It turns a noisy stream
//! of keystrokes into a debounced, latest-wins sequence of requests, discards responses that
//! no longer answer what is on screen, and normalises both upstream record shapes into one
//! canonical [`Feature`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use geosuggest::{
//!     GeocodingClient, SearchCoordinator, SearchRequest, TransportError,
//!     model::upstream::{FeatureV2, Geometry, PropertiesV2},
//!     model::{Precision, UpstreamFeature},
//! };
//!
//! struct OnePlace;
//!
//! #[async_trait]
//! impl GeocodingClient for OnePlace {
//!     async fn autocomplete(&self, request: &SearchRequest) -> Result<Vec<UpstreamFeature>, TransportError> {
//!         Ok(vec![UpstreamFeature::V2(FeatureV2 {
//!             geometry: Some(Geometry::point(48.8566, 2.3522)),
//!             bbox: None,
//!             properties: Some(PropertiesV2 {
//!                 gid: "whosonfirst:locality:101751119".into(),
//!                 layer: "locality".into(),
//!                 name: request.text.clone(),
//!                 precision: Precision::Centroid,
//!                 coarse_location: Some("Ile-de-France, France".into()),
//!                 distance: None,
//!                 confidence: None,
//!                 address_components: None,
//!                 context: None,
//!             }),
//!         })])
//!     }
//!
//!     async fn search(&self, request: &SearchRequest) -> Result<Vec<UpstreamFeature>, TransportError> {
//!         self.autocomplete(request).await
//!     }
//!
//!     async fn place_details(&self, _id: &str) -> Result<Vec<UpstreamFeature>, TransportError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let coordinator = SearchCoordinator::new(Arc::new(OnePlace));
//! let mut suggestions = coordinator.subscribe_suggestions();
//!
//! // Explicit searches skip the debounce.
//! coordinator.on_explicit_search("Paris");
//! suggestions.changed().await.unwrap();
//!
//! let shown = suggestions.borrow_and_update().clone();
//! assert_eq!(shown[0].name, "Paris");
//! assert_eq!(shown[0].coarse_location, "Ile-de-France, France");
//! # }
//! ```
//!
//! # Features
//!
//! - **Debounced type-ahead**: Typed queries are sent once typing pauses
//! - **Latest wins**: Out-of-order responses never overwrite newer results
//! - **Short-circuit**: Blank or short queries clear the list without a network call
//! - **Detail resolution**: Picked suggestions without geometry are completed by id
//! - **Presentation**: Both upstream shapes are normalised into one [`Feature`]

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod client;
mod config;
mod coordinator;
mod detail;
pub mod error;
mod query;
mod staleness;
mod state;

pub use client::{GeocodingClient, SearchEndpoint, SearchRequest, TransportError, layers_param};
pub use config::{CoordinatorConfig, CoordinatorConfigBuilder};
pub use coordinator::{ErrorHook, SearchCoordinator, SearchCoordinatorBuilder};
pub use detail::DetailResolver;
pub use error::{CoordinatorError, DetailLookupError};
pub use geosuggest_model as model;
pub use geosuggest_model::{Feature, LatLon, LayerId, Precision};
pub use query::{Query, QueryTicket, SearchSession};
pub use staleness::{is_current, is_stale, is_superseded};
pub use state::{CoordinatorState, Suggestions};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the geosuggest library.
///
/// `RUST_LOG` takes precedence over `level` when set. Safe to call more than once; only the
/// first call installs a subscriber.
///
/// # Examples
///
/// ```rust
/// use geosuggest::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), geosuggest::error::GeosuggestError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::GeosuggestError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
