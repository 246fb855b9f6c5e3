//! Scripted geocoding client shared by the integration tests.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use geosuggest::{
    CoordinatorConfig, GeocodingClient, SearchCoordinator, SearchEndpoint, SearchRequest,
    TransportError,
    model::{
        Precision, UpstreamFeature,
        upstream::{FeatureV2, Geometry, PropertiesV2},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: SearchEndpoint,
    pub request: SearchRequest,
}

pub enum DetailsReply {
    Features(Vec<UpstreamFeature>),
    Fail,
}

/// Answers every query with one feature named `"{text}#{n}"`, where `n` counts calls.
///
/// Autocomplete results carry no geometry, search results do.
#[derive(Default)]
pub struct MockClient {
    calls: Mutex<Vec<RecordedCall>>,
    detail_calls: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, VecDeque<Duration>>>,
    failures: Mutex<HashSet<String>>,
    panics: Mutex<HashSet<String>>,
    details: Mutex<HashMap<String, DetailsReply>>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Delays the next call for `text`. Repeated calls queue one delay per occurrence.
    pub fn delay(&self, text: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .entry(text.to_string())
            .or_default()
            .push_back(delay);
    }

    /// Makes the next call for `text` fail with a 503.
    pub fn fail_once(&self, text: &str) {
        self.failures.lock().unwrap().insert(text.to_string());
    }

    /// Makes the next call for `text` panic, as a buggy host client might.
    pub fn panic_once(&self, text: &str) {
        self.panics.lock().unwrap().insert(text.to_string());
    }

    pub fn details_reply(&self, id: &str, reply: DetailsReply) {
        self.details.lock().unwrap().insert(id.to_string(), reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queried_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| call.request.text)
            .collect()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    async fn answer(
        &self,
        endpoint: SearchEndpoint,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                endpoint,
                request: request.clone(),
            });
            calls.len()
        };
        let delay = self
            .delays
            .lock()
            .unwrap()
            .get_mut(&request.text)
            .and_then(VecDeque::pop_front);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let panics = self.panics.lock().unwrap().remove(&request.text);
        assert!(!panics, "geocoding client panicked on {:?}", request.text);

        if self.failures.lock().unwrap().remove(&request.text) {
            return Err(TransportError::Status {
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }

        let geometry = (endpoint == SearchEndpoint::Search).then(|| Geometry::point(48.8566, 2.3522));
        Ok(vec![v2_record(
            &format!("mock:{}:{n}", endpoint.as_str()),
            &format!("{}#{n}", request.text),
            geometry,
        )])
    }
}

#[async_trait]
impl GeocodingClient for MockClient {
    async fn autocomplete(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError> {
        self.answer(SearchEndpoint::Autocomplete, request).await
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<UpstreamFeature>, TransportError> {
        self.answer(SearchEndpoint::Search, request).await
    }

    async fn place_details(&self, id: &str) -> Result<Vec<UpstreamFeature>, TransportError> {
        self.detail_calls.lock().unwrap().push(id.to_string());
        match self.details.lock().unwrap().remove(id) {
            Some(DetailsReply::Features(features)) => Ok(features),
            Some(DetailsReply::Fail) => Err(TransportError::Timeout),
            None => Ok(Vec::new()),
        }
    }
}

pub fn v2_record(gid: &str, name: &str, geometry: Option<Geometry>) -> UpstreamFeature {
    UpstreamFeature::V2(FeatureV2 {
        geometry,
        bbox: None,
        properties: Some(PropertiesV2 {
            gid: gid.to_string(),
            layer: "locality".to_string(),
            name: name.to_string(),
            precision: Precision::Centroid,
            coarse_location: Some("Mockland".to_string()),
            distance: None,
            confidence: None,
            address_components: None,
            context: None,
        }),
    })
}

pub fn coordinator(client: &Arc<MockClient>, config: CoordinatorConfig) -> SearchCoordinator {
    let client: Arc<dyn GeocodingClient> = client.clone();
    SearchCoordinator::builder(client).config(config).build()
}

pub fn debounced(millis: u64) -> CoordinatorConfig {
    CoordinatorConfig::builder().debounce_interval_ms(millis).build()
}

pub fn names(coordinator: &SearchCoordinator) -> Vec<String> {
    coordinator
        .suggestions()
        .iter()
        .map(|feature| feature.name.clone())
        .collect()
}

pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
