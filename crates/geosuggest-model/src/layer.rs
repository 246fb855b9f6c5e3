use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A geocoder layer that searches can be restricted to.
///
/// Layers describe the kind of place a feature is, from individual points of interest up to
/// whole continents. The serialised form is the lowercase identifier the geocoding API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Poi,
    Address,
    Street,
    Postalcode,
    Neighbourhood,
    Macrohood,
    Borough,
    Locality,
    Localadmin,
    County,
    Macrocounty,
    Region,
    Macroregion,
    Dependency,
    Country,
    Disputed,
    Empire,
    Continent,
    Marinearea,
    Ocean,
    Coarse,
}

impl LayerId {
    pub const ALL: [Self; 21] = [
        Self::Poi,
        Self::Address,
        Self::Street,
        Self::Postalcode,
        Self::Neighbourhood,
        Self::Macrohood,
        Self::Borough,
        Self::Locality,
        Self::Localadmin,
        Self::County,
        Self::Macrocounty,
        Self::Region,
        Self::Macroregion,
        Self::Dependency,
        Self::Country,
        Self::Disputed,
        Self::Empire,
        Self::Continent,
        Self::Marinearea,
        Self::Ocean,
        Self::Coarse,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poi => "poi",
            Self::Address => "address",
            Self::Street => "street",
            Self::Postalcode => "postalcode",
            Self::Neighbourhood => "neighbourhood",
            Self::Macrohood => "macrohood",
            Self::Borough => "borough",
            Self::Locality => "locality",
            Self::Localadmin => "localadmin",
            Self::County => "county",
            Self::Macrocounty => "macrocounty",
            Self::Region => "region",
            Self::Macroregion => "macroregion",
            Self::Dependency => "dependency",
            Self::Country => "country",
            Self::Disputed => "disputed",
            Self::Empire => "empire",
            Self::Continent => "continent",
            Self::Marinearea => "marinearea",
            Self::Ocean => "ocean",
            Self::Coarse => "coarse",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        // Legacy search responses still call points of interest "venue".
        if needle == "venue" {
            return Ok(Self::Poi);
        }
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownLayer(s.to_string()))
    }
}

/// How exact a feature's coordinates are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// The coordinates identify the place itself (an address, a building entrance).
    Point,
    /// The coordinates are a representative centre of an area.
    #[default]
    Centroid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_round_trips_through_its_identifier() {
        for layer in LayerId::ALL {
            assert_eq!(layer.as_str().parse::<LayerId>().unwrap(), layer);
        }
    }

    #[test]
    fn test_venue_parses_as_poi() {
        assert_eq!("venue".parse::<LayerId>().unwrap(), LayerId::Poi);
        assert_eq!(" Locality ".parse::<LayerId>().unwrap(), LayerId::Locality);
    }

    #[test]
    fn test_unknown_layer_is_rejected() {
        let err = "galaxy".parse::<LayerId>().unwrap_err();
        assert!(matches!(err, ModelError::UnknownLayer(ref s) if s == "galaxy"));
    }

    #[test]
    fn test_serde_uses_lowercase_identifiers() {
        let json = serde_json::to_string(&[LayerId::Postalcode, LayerId::Poi]).unwrap();
        assert_eq!(json, r#"["postalcode","poi"]"#);
        let precision: Precision = serde_json::from_str(r#""point""#).unwrap();
        assert_eq!(precision, Precision::Point);
    }
}
