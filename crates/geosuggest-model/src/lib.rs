//! Data layer of the geosuggest autocomplete engine.
//!
//! This crate holds the two families of place records the geocoding API returns (the v2 shape
//! and the older Pelias-style shape used by deep search), the canonical [`Feature`] the rest
//! of the engine works with, and the rules that turn one into the other.
//!
//! ```rust
//! use geosuggest_model::{FeatureCollection, adapt::adapt_all};
//!
//! let collection = FeatureCollection::from_json(
//!     r#"{"features": [{
//!         "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
//!         "properties": {"gid": "osm:venue:1", "layer": "venue", "name": "Cafe de Flore",
//!                        "accuracy": "point", "locality": "Paris", "country": "France"}
//!     }]}"#,
//! )?;
//!
//! let features = adapt_all(collection.features);
//! assert_eq!(features[0].layer, "poi");
//! assert_eq!(features[0].coarse_location, "Paris, France");
//! # Ok::<(), geosuggest_model::ModelError>(())
//! ```

pub mod adapt;
mod error;
mod feature;
mod layer;
pub mod upstream;

pub use adapt::IntoFeature;
pub use error::{ModelError, Result};
pub use feature::{AddressComponents, ContextComponent, Feature, LatLon, PlaceContext, Point};
pub use layer::{LayerId, Precision};
pub use upstream::{FeatureCollection, UpstreamFeature};
