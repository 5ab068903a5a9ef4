use std::collections::BTreeSet;
use std::sync::Arc;

use geo::MultiLineString;

use crate::crs::Crs;

/// A road segment line with its category tag. Categories are shared by many
/// roads; there is no uniqueness constraint.
#[derive(Debug, Clone)]
pub struct RoadFeature {
    pub geometry: MultiLineString<f64>,
    pub category: Arc<str>,
}

impl RoadFeature {
    /// Build a road feature. `LineString` inputs are promoted to `MultiLineString`.
    pub fn new(geometry: impl Into<MultiLineString<f64>>, category: &str) -> Self {
        Self { geometry: geometry.into(), category: Arc::from(category) }
    }
}

/// Immutable store of road features, tagged with their CRS.
#[derive(Debug, Clone)]
pub struct RoadSet {
    features: Vec<RoadFeature>,
    crs: Crs,
}

impl RoadSet {
    /// Build a road store.
    pub fn new(features: Vec<RoadFeature>, crs: Crs) -> Self {
        Self { features, crs }
    }

    /// Number of roads.
    #[inline] pub fn len(&self) -> usize { self.features.len() }

    /// Check if the store is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// CRS tag of every geometry in the store.
    #[inline] pub fn crs(&self) -> Crs { self.crs }

    /// Iterate roads in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RoadFeature> {
        self.features.iter()
    }

    /// Sorted distinct category values, for building selection UIs.
    pub fn categories(&self) -> Vec<String> {
        self.features.iter()
            .map(|road| road.category.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// New store holding only roads of the given category. The receiver is
    /// left untouched.
    pub fn filter_category(&self, category: &str) -> RoadSet {
        RoadSet {
            features: self.features.iter()
                .filter(|road| road.category.as_ref() == category)
                .cloned()
                .collect(),
            crs: self.crs,
        }
    }
}
