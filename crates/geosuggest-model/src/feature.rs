//! The canonical place representation handed to rendering and to the host application.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Precision;

/// Mean earth radius in metres (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A GeoJSON point, stored in `[longitude, latitude]` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub coordinates: [f64; 2],
}

impl Point {
    pub const fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            coordinates: [lon, lat],
        }
    }

    pub const fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub const fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub const fn to_lat_lon(self) -> LatLon {
        LatLon::new(self.lat(), self.lon())
    }
}

/// Street-level parts of an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    pub number: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
}

impl AddressComponents {
    /// Returns `None` when none of the parts are known.
    pub fn non_empty(self) -> Option<Self> {
        (self.number.is_some() || self.postal_code.is_some() || self.street.is_some())
            .then_some(self)
    }
}

/// One entry of the administrative hierarchy surrounding a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextComponent {
    pub id: String,
    pub name: String,
    pub abbreviation: Option<String>,
}

impl ContextComponent {
    /// Builds a component only when both the identifier and the name are known.
    pub fn from_parts(
        id: Option<String>,
        name: Option<String>,
        abbreviation: Option<String>,
    ) -> Option<Self> {
        match (id, name) {
            (Some(id), Some(name)) => Some(Self {
                id,
                name,
                abbreviation,
            }),
            _ => None,
        }
    }
}

/// The administrative hierarchy a feature sits in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceContext {
    pub borough: Option<ContextComponent>,
    pub continent: Option<ContextComponent>,
    pub country: Option<ContextComponent>,
    pub county: Option<ContextComponent>,
    pub locality: Option<ContextComponent>,
    pub neighbourhood: Option<ContextComponent>,
}

impl PlaceContext {
    pub const fn is_empty(&self) -> bool {
        self.borough.is_none()
            && self.continent.is_none()
            && self.country.is_none()
            && self.county.is_none()
            && self.locality.is_none()
            && self.neighbourhood.is_none()
    }

    /// Returns `None` when no level of the hierarchy is known.
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// A place suggestion in its canonical form.
///
/// Every feature produced by the adapter has an `id`, a `name` and a `layer`. Features from
/// the autocomplete endpoint may be incomplete (no `geometry`); those have to be resolved
/// through a place-details lookup before they are treated as a final selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Global identifier, used as the key for place-details lookups
    pub id: String,
    pub name: String,
    /// Layer identifier (`poi`, `address`, `locality`, ...)
    pub layer: String,
    pub precision: Precision,
    pub geometry: Option<Point>,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bbox: Option<[f64; 4]>,
    /// Human readable "City, Country" style subtitle
    pub coarse_location: String,
    /// Distance reported by the geocoder relative to the focus point
    pub distance_meters: Option<f64>,
    pub confidence: Option<f64>,
    pub address_components: Option<AddressComponents>,
    pub context: Option<PlaceContext>,
}

impl Feature {
    pub fn new(id: impl Into<String>, name: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layer: layer.into(),
            precision: Precision::default(),
            geometry: None,
            bbox: None,
            coarse_location: String::new(),
            distance_meters: None,
            confidence: None,
            address_components: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, lat: f64, lon: f64) -> Self {
        self.geometry = Some(Point::from_lat_lon(lat, lon));
        self
    }

    #[must_use]
    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    #[must_use]
    pub fn with_coarse_location(mut self, coarse_location: impl Into<String>) -> Self {
        self.coarse_location = coarse_location.into();
        self
    }

    /// Whether the feature carries precise geometry and needs no details lookup.
    pub const fn is_complete(&self) -> bool {
        self.geometry.is_some()
    }

    /// The point geometry if present, otherwise the middle of the bounding box.
    pub fn center(&self) -> Option<LatLon> {
        if let Some(point) = self.geometry {
            return Some(point.to_lat_lon());
        }
        self.bbox.map(|[min_lon, min_lat, max_lon, max_lat]| {
            LatLon::new(f64::midpoint(min_lat, max_lat), f64::midpoint(min_lon, max_lon))
        })
    }

    /// Distance to show next to the suggestion.
    ///
    /// Prefers the distance computed by the geocoder; falls back to the straight-line distance
    /// between `relative_to` and the feature's center.
    pub fn display_distance_meters(&self, relative_to: Option<LatLon>) -> Option<f64> {
        self.distance_meters.or_else(|| {
            let origin = relative_to?;
            self.center().map(|center| origin.distance_to(&center))
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coarse_location.is_empty() {
            write!(f, "{} [{}]", self.name, self.layer)
        } else {
            write!(f, "{}, {} [{}]", self.name, self.coarse_location, self.layer)
        }
    }
}
