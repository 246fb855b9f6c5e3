//! Type-ahead against an in-memory gazetteer
//!
//! This example demonstrates the coordinator end to end:
//! - Plugging a custom `GeocodingClient` into a `SearchCoordinator`
//! - Simulated keystrokes collapsing into a single debounced request
//! - Selecting a suggestion and resolving it through a place-details lookup

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use geosuggest::{
    CoordinatorConfig, GeocodingClient, LayerId, SearchCoordinator, SearchRequest,
    TransportError, init_logging,
    model::{FeatureCollection, UpstreamFeature},
};
use tracing::Level;

const GAZETTEER: &str = r#"{"features": [
  {"geometry": {"type": "Point", "coordinates": [2.3522, 48.8566]},
   "properties": {"gid": "whosonfirst:locality:101751119", "layer": "locality", "name": "Paris",
                  "accuracy": "centroid", "region": "Ile-de-France", "country": "France"}},
  {"geometry": {"type": "Point", "coordinates": [-95.5555, 33.6609]},
   "properties": {"gid": "whosonfirst:locality:101725293", "layer": "locality", "name": "Paris",
                  "accuracy": "centroid", "region": "Texas", "country": "United States"}},
  {"geometry": {"type": "Point", "coordinates": [2.3327, 48.8541]},
   "properties": {"gid": "openstreetmap:venue:node/123", "layer": "venue", "name": "Cafe de Flore",
                  "accuracy": "point", "locality": "Paris", "country": "France"}}
]}"#;

/// Answers from a fixed list of places, with some artificial latency.
struct Gazetteer {
    places: Vec<UpstreamFeature>,
}

impl Gazetteer {
    fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let places = FeatureCollection::from_json(GAZETTEER)?.features;
        Ok(Self { places })
    }

    fn matching(&self, text: &str) -> Vec<UpstreamFeature> {
        let needle = text.to_lowercase();
        self.places
            .iter()
            .filter(|place| {
                place_name(place).is_some_and(|name| name.to_lowercase().starts_with(&needle))
            })
            .cloned()
            .collect()
    }
}

fn place_name(place: &UpstreamFeature) -> Option<&str> {
    match place {
        UpstreamFeature::V2(v2) => v2.properties.as_ref().map(|p| p.name.as_str()),
        UpstreamFeature::Legacy(legacy) => legacy.properties.as_ref()?.name.as_deref(),
    }
}

fn place_gid(place: &UpstreamFeature) -> Option<&str> {
    match place {
        UpstreamFeature::V2(v2) => v2.properties.as_ref().map(|p| p.gid.as_str()),
        UpstreamFeature::Legacy(legacy) => legacy.properties.as_ref()?.gid.as_deref(),
    }
}

#[async_trait]
impl GeocodingClient for Gazetteer {
    async fn autocomplete(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError> {
        tokio::time::sleep(Duration::from_millis(40)).await;
        // Autocomplete hits carry no geometry, like the real endpoint.
        let mut hits = self.matching(&request.text);
        for hit in &mut hits {
            match hit {
                UpstreamFeature::V2(v2) => v2.geometry = None,
                UpstreamFeature::Legacy(legacy) => legacy.geometry = None,
            }
        }
        Ok(hits)
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError> {
        tokio::time::sleep(Duration::from_millis(120)).await;
        Ok(self.matching(&request.text))
    }

    async fn place_details(&self, id: &str) -> Result<Vec<UpstreamFeature>, TransportError> {
        Ok(self
            .places
            .iter()
            .filter(|place| place_gid(place) == Some(id))
            .cloned()
            .collect())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(Level::INFO)?;

    let config = CoordinatorConfig::builder()
        .min_query_length(2)
        .debounce_interval_ms(150)
        .user_location(48.85, 2.35)?
        .layers([LayerId::Locality, LayerId::Poi])
        .build();
    let coordinator = SearchCoordinator::builder(Arc::new(Gazetteer::load()?))
        .config(config)
        .build();

    let mut suggestions = coordinator.subscribe_suggestions();
    coordinator.on_panel_active_changed(true);
    for text in ["p", "pa", "par", "pari", "paris"] {
        println!("Typed {text:?}");
        coordinator.on_query_changed(text);
        tokio::time::sleep(Duration::from_millis(60)).await;
    }

    suggestions.changed().await?;
    let shown = suggestions.borrow_and_update().clone();

    println!("\nSuggestions for 'paris':");
    let here = coordinator.configuration().user_location;
    for (i, feature) in shown.iter().enumerate() {
        let distance = feature
            .display_distance_meters(here)
            .map_or_else(|| "?".to_string(), |m| format!("{:.1} km", m / 1000.0));
        println!("  {}. {feature} - {distance}", i + 1);
    }

    if let Some(picked) = shown.first().cloned() {
        let resolved = coordinator.on_feature_selected(picked).await?;
        println!("\nSelected {resolved} at {:?}", resolved.center());
    }

    Ok(())
}
