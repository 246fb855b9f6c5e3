//! Feature records exactly as the geocoding API returns them.
//!
//! Two shapes are in circulation: the v2 shape returned by the autocomplete and place-details
//! endpoints, and the older Pelias-style shape that the deeper search endpoint still returns.
//! Both are decoded leniently; normalisation into [`crate::Feature`] lives in
//! [`crate::adapt`].

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::{Precision, error::Result};

/// A GeoJSON geometry. Only points are meaningful to the autocomplete engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl Geometry {
    pub fn point(lat: f64, lon: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: vec![lon, lat],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponentsV2 {
    pub number: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
}

/// One level of the hierarchy. Either part may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WofContextComponent {
    pub gid: Option<String>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}

/// Who's On First hierarchy attached to a v2 feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WofContext {
    pub borough: Option<WofContextComponent>,
    pub continent: Option<WofContextComponent>,
    pub country: Option<WofContextComponent>,
    pub county: Option<WofContextComponent>,
    pub locality: Option<WofContextComponent>,
    pub neighbourhood: Option<WofContextComponent>,
    pub region: Option<WofContextComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextV2 {
    pub whosonfirst: Option<WofContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesV2 {
    pub gid: String,
    pub layer: String,
    pub name: String,
    pub precision: Precision,
    #[serde(default)]
    pub coarse_location: Option<String>,
    /// Kilometres from the focus point
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub address_components: Option<AddressComponentsV2>,
    #[serde(default)]
    pub context: Option<ContextV2>,
}

/// A feature in the v2 shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureV2 {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub properties: Option<PropertiesV2>,
}

/// Flat Pelias-style properties of a legacy search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProperties {
    pub gid: Option<String>,
    pub layer: Option<String>,
    pub name: Option<String>,
    /// `"point"` or `"centroid"`
    pub accuracy: Option<String>,
    pub confidence: Option<f64>,
    pub distance: Option<f64>,

    pub housenumber: Option<String>,
    pub postalcode: Option<String>,
    pub street: Option<String>,

    pub borough: Option<String>,
    pub borough_gid: Option<String>,
    pub continent: Option<String>,
    pub continent_gid: Option<String>,
    pub country: Option<String>,
    pub country_gid: Option<String>,
    pub country_a: Option<String>,
    pub county: Option<String>,
    pub county_gid: Option<String>,
    pub locality: Option<String>,
    pub locality_gid: Option<String>,
    pub neighbourhood: Option<String>,
    pub neighbourhood_gid: Option<String>,
    pub region: Option<String>,
    pub region_gid: Option<String>,
}

/// A feature in the legacy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFeature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub properties: Option<LegacyProperties>,
}

/// Either upstream shape.
///
/// Records whose properties carry `precision` are v2 and must decode as v2; a malformed v2
/// record is an error, never a legacy record. Everything else is decoded as legacy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpstreamFeature {
    V2(FeatureV2),
    Legacy(LegacyFeature),
}

impl UpstreamFeature {
    fn is_v2(record: &Value) -> bool {
        record
            .get("properties")
            .and_then(|properties| properties.get("precision"))
            .is_some_and(|precision| !precision.is_null())
    }
}

impl<'de> Deserialize<'de> for UpstreamFeature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = Value::deserialize(deserializer)?;
        if Self::is_v2(&record) {
            serde_json::from_value(record)
                .map(Self::V2)
                .map_err(|e| D::Error::custom(format!("invalid v2 feature: {e}")))
        } else {
            serde_json::from_value(record)
                .map(Self::Legacy)
                .map_err(|e| D::Error::custom(format!("invalid legacy feature: {e}")))
        }
    }
}

impl From<FeatureV2> for UpstreamFeature {
    fn from(feature: FeatureV2) -> Self {
        Self::V2(feature)
    }
}

impl From<LegacyFeature> for UpstreamFeature {
    fn from(feature: LegacyFeature) -> Self {
        Self::Legacy(feature)
    }
}

/// A GeoJSON feature collection as returned by every geocoding endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<UpstreamFeature>,
}

impl FeatureCollection {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_record_decodes_as_v2() {
        let json = r#"{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
            "properties": {"gid": "wof:locality:1", "layer": "locality", "name": "Paris", "precision": "centroid"}
        }"#;
        let record: UpstreamFeature = serde_json::from_str(json).unwrap();
        assert!(matches!(record, UpstreamFeature::V2(_)));
    }

    #[test]
    fn test_legacy_record_decodes_as_legacy() {
        let json = r#"{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
            "properties": {"gid": "osm:venue:1", "layer": "venue", "name": "Cafe", "accuracy": "point"}
        }"#;
        let record: UpstreamFeature = serde_json::from_str(json).unwrap();
        let UpstreamFeature::Legacy(legacy) = record else {
            panic!("expected a legacy record");
        };
        assert_eq!(legacy.properties.unwrap().accuracy.as_deref(), Some("point"));
    }

    #[test]
    fn test_malformed_v2_record_is_an_error_naming_the_field() {
        let json = r#"{"features": [{
            "properties": {"layer": "locality", "name": "Paris", "precision": "centroid"}
        }]}"#;
        let err = FeatureCollection::from_json(json).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid v2 feature"), "{message}");
        assert!(message.contains("gid"), "{message}");
    }

    #[test]
    fn test_null_precision_is_not_v2() {
        let json = r#"{"properties": {"gid": "a", "layer": "venue", "name": "A", "precision": null}}"#;
        let record: UpstreamFeature = serde_json::from_str(json).unwrap();
        assert!(matches!(record, UpstreamFeature::Legacy(_)));
    }

    #[test]
    fn test_collection_from_json() {
        let collection = FeatureCollection::from_json(r#"{"type": "FeatureCollection", "features": []}"#)
            .unwrap();
        assert!(collection.features.is_empty());
        assert!(FeatureCollection::from_json("not json").is_err());
    }
}
