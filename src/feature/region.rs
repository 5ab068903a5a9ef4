use std::sync::Arc;

use ahash::AHashMap;
use geo::MultiPolygon;

use crate::crs::Crs;
use crate::error::{Error, Result};

/// An administrative region polygon with its attribute record.
///
/// `area_km2` is the region's area in km² of the projected plane, when the
/// source data carries it as an attribute. When absent it is computed from
/// the geometry after reprojection.
#[derive(Debug, Clone)]
pub struct RegionFeature {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub geometry: MultiPolygon<f64>,
    pub area_km2: Option<f64>,
}

impl RegionFeature {
    /// Build a region feature. `Polygon` inputs are promoted to `MultiPolygon`.
    pub fn new(id: &str, name: &str, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            id: Arc::from(id),
            name: Arc::from(name),
            geometry: geometry.into(),
            area_km2: None,
        }
    }

    /// Attach a known area attribute (km², projected plane).
    pub fn with_area_km2(mut self, area_km2: f64) -> Self {
        self.area_km2 = Some(area_km2);
        self
    }
}

/// Immutable store of region features, tagged with their CRS.
///
/// Region ids are unique; construction fails on duplicates. The store is
/// never mutated after construction — filtering and reprojection produce new
/// collections.
#[derive(Debug, Clone)]
pub struct RegionSet {
    features: Vec<RegionFeature>,
    index: AHashMap<Arc<str>, usize>,
    crs: Crs,
}

impl RegionSet {
    /// Build a region store, rejecting duplicate ids.
    pub fn new(features: Vec<RegionFeature>, crs: Crs) -> Result<Self> {
        let mut index = AHashMap::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            if index.insert(feature.id.clone(), i).is_some() {
                return Err(Error::DuplicateRegion { region_id: feature.id.clone() });
            }
        }
        Ok(Self { features, index, crs })
    }

    /// Number of regions.
    #[inline] pub fn len(&self) -> usize { self.features.len() }

    /// Check if the store is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// CRS tag of every geometry in the store.
    #[inline] pub fn crs(&self) -> Crs { self.crs }

    /// Iterate regions in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RegionFeature> {
        self.features.iter()
    }

    /// Look up a region by id.
    pub fn get(&self, id: &str) -> Option<&RegionFeature> {
        self.index.get(id).map(|&i| &self.features[i])
    }
}
