//! Resolving a picked suggestion into a complete feature.

mod common;

use std::sync::Arc;

use common::{DetailsReply, MockClient, coordinator, debounced, v2_record};
use geosuggest::{
    DetailLookupError, DetailResolver, Feature, GeocodingClient, TransportError,
    model::{
        UpstreamFeature,
        upstream::{FeatureV2, Geometry},
    },
};

const GID: &str = "whosonfirst:locality:101751119";

fn incomplete() -> Feature {
    Feature::new(GID, "Paris", "locality").with_coarse_location("France")
}

#[tokio::test(start_paused = true)]
async fn test_complete_feature_is_returned_without_a_lookup() {
    let client = MockClient::new();
    let coordinator = coordinator(&client, debounced(100));
    let feature = incomplete().with_geometry(48.8566, 2.3522);

    let resolved = coordinator.on_feature_selected(feature.clone()).await.unwrap();

    assert_eq!(resolved, feature);
    assert!(client.detail_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_incomplete_feature_is_resolved_by_id() {
    let client = MockClient::new();
    client.details_reply(
        GID,
        DetailsReply::Features(vec![
            v2_record(GID, "Paris", Some(Geometry::point(48.8566, 2.3522))),
            v2_record("whosonfirst:locality:2", "Paris, Texas", None),
        ]),
    );
    let coordinator = coordinator(&client, debounced(100));

    let resolved = coordinator.on_feature_selected(incomplete()).await.unwrap();

    assert_eq!(client.detail_calls(), [GID]);
    assert_eq!(resolved.id, GID);
    assert_eq!(resolved.name, "Paris");
    assert!(resolved.is_complete());
    let center = resolved.center().unwrap();
    assert!((center.lat - 48.8566).abs() < 1e-9);
    assert!((center.lon - 2.3522).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_empty_details_response_is_an_error() {
    let client = MockClient::new();
    client.details_reply(GID, DetailsReply::Features(Vec::new()));
    let coordinator = coordinator(&client, debounced(100));

    let err = coordinator.on_feature_selected(incomplete()).await.unwrap_err();

    assert!(matches!(err, DetailLookupError::NoFeatures { ref id } if id == GID));
}

#[tokio::test(start_paused = true)]
async fn test_details_record_without_properties_is_an_error() {
    let client = MockClient::new();
    client.details_reply(
        GID,
        DetailsReply::Features(vec![UpstreamFeature::V2(FeatureV2 {
            geometry: Some(Geometry::point(48.8566, 2.3522)),
            bbox: None,
            properties: None,
        })]),
    );
    let coordinator = coordinator(&client, debounced(100));

    let err = coordinator.on_feature_selected(incomplete()).await.unwrap_err();

    assert!(matches!(err, DetailLookupError::Unadaptable { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_surfaced() {
    let client = MockClient::new();
    client.details_reply(GID, DetailsReply::Fail);
    let coordinator = coordinator(&client, debounced(100));

    let err = coordinator.on_feature_selected(incomplete()).await.unwrap_err();

    assert!(matches!(
        err,
        DetailLookupError::Transport {
            source: TransportError::Timeout,
            ..
        }
    ));
    assert!(err.to_string().contains(GID));
}

#[tokio::test(start_paused = true)]
async fn test_selection_closes_the_panel_even_when_lookup_fails() {
    let client = MockClient::new();
    client.details_reply(GID, DetailsReply::Fail);
    let coordinator = coordinator(&client, debounced(100));
    coordinator.on_panel_active_changed(true);

    let result = coordinator.on_feature_selected(incomplete()).await;

    assert!(result.is_err());
    assert!(!coordinator.is_active());
}

#[tokio::test]
async fn test_resolver_can_be_used_without_a_coordinator() {
    let client = MockClient::new();
    client.details_reply(
        GID,
        DetailsReply::Features(vec![v2_record(
            GID,
            "Paris",
            Some(Geometry::point(48.8566, 2.3522)),
        )]),
    );
    let shared: Arc<dyn GeocodingClient> = client.clone();
    let resolver = DetailResolver::new(shared);

    let resolved = resolver.resolve(incomplete()).await.unwrap();

    assert!(resolved.is_complete());
    assert_eq!(client.detail_calls().len(), 1);
}
