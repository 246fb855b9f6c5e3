//! Normalisation of upstream records into the canonical [`Feature`].
//!
//! The mapping is lossy but deterministic: the same record always yields the same feature.
//! Records without a properties payload map to `None` and are dropped from result lists.

use itertools::Itertools;
use tracing::trace;

use crate::{
    AddressComponents, ContextComponent, Feature, PlaceContext, Point, Precision,
    upstream::{
        FeatureV2, Geometry, LegacyFeature, LegacyProperties, UpstreamFeature, WofContext,
        WofContextComponent,
    },
};

/// Conversion of an upstream record into a canonical feature.
pub trait IntoFeature {
    fn into_feature(self) -> Option<Feature>;
}

/// Adapts a batch of records, dropping the ones that cannot be represented.
pub fn adapt_all<I>(records: I) -> Vec<Feature>
where
    I: IntoIterator,
    I::Item: IntoFeature,
{
    records
        .into_iter()
        .filter_map(IntoFeature::into_feature)
        .collect()
}

impl IntoFeature for UpstreamFeature {
    fn into_feature(self) -> Option<Feature> {
        match self {
            Self::V2(feature) => feature.into_feature(),
            Self::Legacy(feature) => feature.into_feature(),
        }
    }
}

impl IntoFeature for FeatureV2 {
    fn into_feature(self) -> Option<Feature> {
        let props = self.properties?;
        let wof = props.context.and_then(|c| c.whosonfirst).unwrap_or_default();

        let coarse_location = props.coarse_location.unwrap_or_else(|| {
            let names = CoarseParts::from_wof(&wof);
            coarse_location(&props.layer, &names)
        });

        Some(Feature {
            id: props.gid,
            layer: canonical_layer(&props.layer),
            name: props.name,
            precision: props.precision,
            geometry: self.geometry.as_ref().and_then(point_geometry),
            bbox: self.bbox.as_deref().and_then(bounding_box),
            coarse_location,
            distance_meters: props.distance.map(|km| km * 1000.0),
            confidence: props.confidence,
            address_components: props.address_components.and_then(|a| {
                AddressComponents {
                    number: a.number,
                    postal_code: a.postal_code,
                    street: a.street,
                }
                .non_empty()
            }),
            context: wof_place_context(wof),
        })
    }
}

impl IntoFeature for LegacyFeature {
    fn into_feature(self) -> Option<Feature> {
        let Some(props) = self.properties else {
            trace!("Dropping legacy record without properties");
            return None;
        };
        let (Some(gid), Some(layer), Some(name)) =
            (props.gid.clone(), props.layer.clone(), props.name.clone())
        else {
            trace!(gid = ?props.gid, "Dropping legacy record without gid, layer or name");
            return None;
        };

        let precision = if props.accuracy.as_deref() == Some("point") {
            Precision::Point
        } else {
            Precision::Centroid
        };
        let coarse_location = coarse_location(&layer, &CoarseParts::from_legacy(&props));

        Some(Feature {
            id: gid,
            layer: canonical_layer(&layer),
            name,
            precision,
            geometry: self.geometry.as_ref().and_then(point_geometry),
            bbox: self.bbox.as_deref().and_then(bounding_box),
            coarse_location,
            distance_meters: None,
            confidence: props.confidence,
            address_components: AddressComponents {
                number: props.housenumber.clone(),
                postal_code: props.postalcode.clone(),
                street: props.street.clone(),
            }
            .non_empty(),
            context: legacy_place_context(props),
        })
    }
}

/// Renames the legacy `venue` layer to `poi`; everything else passes through.
pub fn canonical_layer(layer: &str) -> String {
    match layer {
        "venue" => "poi".to_string(),
        other => other.to_string(),
    }
}

/// Names available for building a coarse location subtitle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoarseParts<'a> {
    pub locality: Option<&'a str>,
    pub region: Option<&'a str>,
    pub country: Option<&'a str>,
    pub continent: Option<&'a str>,
}

impl<'a> CoarseParts<'a> {
    fn from_legacy(props: &'a LegacyProperties) -> Self {
        Self {
            locality: props.locality.as_deref(),
            region: props.region.as_deref(),
            country: props.country.as_deref(),
            continent: props.continent.as_deref(),
        }
    }

    fn from_wof(wof: &'a WofContext) -> Self {
        let name = |c: &'a Option<WofContextComponent>| c.as_ref()?.name.as_deref();
        Self {
            locality: name(&wof.locality),
            region: name(&wof.region),
            country: name(&wof.country),
            continent: name(&wof.continent),
        }
    }
}

/// Builds the "where is this" subtitle from the layer-keyed rule table.
pub fn coarse_location(layer: &str, names: &CoarseParts<'_>) -> String {
    let parts: Vec<Option<&str>> = match layer {
        "venue" | "poi" | "address" | "street" | "neighbourhood" | "postalcode" | "macrohood" => {
            vec![names.locality.or(names.region), names.country]
        }
        "country" | "dependency" | "disputed" => vec![names.continent],
        "macroregion" | "region" => vec![names.country],
        "macrocounty" | "county" | "locality" | "localadmin" | "borough" => {
            vec![names.region, names.country]
        }
        other => vec![Some(other)],
    };
    parts.into_iter().flatten().join(", ")
}

fn point_geometry(geometry: &Geometry) -> Option<Point> {
    match (geometry.kind.as_str(), geometry.coordinates.as_slice()) {
        ("Point", [lon, lat, ..]) => Some(Point {
            coordinates: [*lon, *lat],
        }),
        _ => None,
    }
}

fn bounding_box(bbox: &[f64]) -> Option<[f64; 4]> {
    bbox.try_into().ok()
}

fn wof_component(component: Option<WofContextComponent>) -> Option<ContextComponent> {
    component.and_then(|c| ContextComponent::from_parts(c.gid, c.name, c.abbreviation))
}

fn wof_place_context(wof: WofContext) -> Option<PlaceContext> {
    PlaceContext {
        borough: wof_component(wof.borough),
        continent: wof_component(wof.continent),
        country: wof_component(wof.country),
        county: wof_component(wof.county),
        locality: wof_component(wof.locality),
        neighbourhood: wof_component(wof.neighbourhood),
    }
    .non_empty()
}

fn legacy_place_context(props: LegacyProperties) -> Option<PlaceContext> {
    PlaceContext {
        borough: ContextComponent::from_parts(props.borough_gid, props.borough, None),
        continent: ContextComponent::from_parts(props.continent_gid, props.continent, None),
        country: ContextComponent::from_parts(props.country_gid, props.country, props.country_a),
        county: ContextComponent::from_parts(props.county_gid, props.county, None),
        locality: ContextComponent::from_parts(props.locality_gid, props.locality, None),
        neighbourhood: ContextComponent::from_parts(
            props.neighbourhood_gid,
            props.neighbourhood,
            None,
        ),
    }
    .non_empty()
}
