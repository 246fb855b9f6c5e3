use std::time::Duration;

use geosuggest_model::{LatLon, LayerId};
use serde::{Deserialize, Serialize};

use crate::{client::layers_param, error::GeosuggestError};

/// Tunables of the autocomplete pipeline.
///
/// Changes apply to the next query admitted by the pipeline; requests already in flight keep
/// the settings they were issued with.
///
/// # Examples
///
/// ```rust
/// use geosuggest::{CoordinatorConfig, LayerId};
///
/// let config = CoordinatorConfig::builder()
///     .min_query_length(3)
///     .debounce_interval_ms(150)
///     .layers([LayerId::Address, LayerId::Poi])
///     .build();
///
/// assert_eq!(config.layers_param().as_deref(), Some("address,poi"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Queries shorter than this many characters (after trimming) never hit the network.
    ///
    /// While ~3 makes sense for many languages (ex: English), it definitely doesn't for
    /// others (ex: Chinese, Japanese, or Korean).
    pub min_query_length: usize,
    /// Quiet period after the last keystroke before a query is sent
    pub debounce_interval_ms: u64,
    /// Biases results towards this location
    pub user_location: Option<LatLon>,
    /// Restricts results to these layers
    pub layer_filter: Option<Vec<LayerId>>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            min_query_length: 1,
            debounce_interval_ms: 300,
            user_location: None,
            layer_filter: None,
        }
    }
}

impl CoordinatorConfig {
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::default()
    }

    pub const fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_interval_ms)
    }

    /// The layer filter as a comma-joined request parameter. An empty filter is no filter.
    pub fn layers_param(&self) -> Option<String> {
        self.layer_filter
            .as_ref()
            .filter(|layers| !layers.is_empty())
            .map(|layers| layers_param(layers))
    }

    /// Whether `text` is long enough to be sent to the geocoder.
    pub fn accepts(&self, text: &str) -> bool {
        let trimmed = text.trim();
        !trimmed.is_empty() && trimmed.chars().count() >= self.min_query_length
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GeosuggestError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GeosuggestError::ConfigError(format!("Invalid configuration: {e}")))?;
        if let Some(location) = config.user_location {
            validate_location(location)?;
        }
        Ok(config)
    }
}

fn validate_location(location: LatLon) -> Result<LatLon, GeosuggestError> {
    if !(-90.0..=90.0).contains(&location.lat) {
        return Err(GeosuggestError::ConfigError(format!(
            "Latitude must be within [-90, 90], got {}",
            location.lat
        )));
    }
    if !(-180.0..=180.0).contains(&location.lon) {
        return Err(GeosuggestError::ConfigError(format!(
            "Longitude must be within [-180, 180], got {}",
            location.lon
        )));
    }
    Ok(location)
}

/// Builder for creating coordinator configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfigBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: CoordinatorConfig::default(),
        }
    }

    /// Require at least this many characters before searching
    pub const fn min_query_length(mut self, length: usize) -> Self {
        self.config.min_query_length = length;
        self
    }

    pub fn debounce_interval(mut self, interval: Duration) -> Self {
        self.config.debounce_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub const fn debounce_interval_ms(mut self, millis: u64) -> Self {
        self.config.debounce_interval_ms = millis;
        self
    }

    /// Bias results towards a location (must be a valid WGS84 coordinate)
    pub fn user_location(mut self, lat: f64, lon: f64) -> Result<Self, GeosuggestError> {
        self.config.user_location = Some(validate_location(LatLon::new(lat, lon))?);
        Ok(self)
    }

    pub const fn clear_user_location(mut self) -> Self {
        self.config.user_location = None;
        self
    }

    /// Restrict results to the given layers
    pub fn layers(mut self, layers: impl IntoIterator<Item = LayerId>) -> Self {
        self.config.layer_filter = Some(layers.into_iter().collect());
        self
    }

    pub fn clear_layers(mut self) -> Self {
        self.config.layer_filter = None;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CoordinatorConfig {
        self.config
    }
}
