//! Turning a picked suggestion into a complete feature.

use std::{fmt, sync::Arc};

use geosuggest_model::{Feature, IntoFeature};
use tracing::{debug, instrument};

use crate::{client::GeocodingClient, error::DetailLookupError};

/// Resolves incomplete suggestions through the place-details endpoint.
///
/// Search results always carry geometry and pass through untouched. Autocomplete results may
/// not, and are looked up by id; the first feature of the details response wins.
#[derive(Clone)]
pub struct DetailResolver {
    client: Arc<dyn GeocodingClient>,
}

impl fmt::Debug for DetailResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailResolver").finish_non_exhaustive()
    }
}

impl DetailResolver {
    pub fn new(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }

    #[instrument(name = "Resolve feature", skip_all, level = "debug", fields(id = %feature.id))]
    pub async fn resolve(&self, feature: Feature) -> Result<Feature, DetailLookupError> {
        if feature.is_complete() {
            debug!("Feature already has geometry; no lookup needed");
            return Ok(feature);
        }

        let id = feature.id;
        let records = self
            .client
            .place_details(&id)
            .await
            .map_err(|source| DetailLookupError::Transport {
                id: id.clone(),
                source,
            })?;
        debug!(records = records.len(), "Place details received");

        let first = records
            .into_iter()
            .next()
            .ok_or_else(|| DetailLookupError::NoFeatures { id: id.clone() })?;
        first
            .into_feature()
            .ok_or(DetailLookupError::Unadaptable { id })
    }
}
