//! Mandatory reprojection stage.
//!
//! Length and area arithmetic is only defined on [`ProjectedRegions`] and
//! [`ProjectedRoads`], and the sole way to obtain those types is through the
//! functions here. Measuring geometry that is still in a geographic CRS is
//! therefore a compile error, not a runtime surprise.

use std::sync::Arc;

use ahash::AHashMap;
use geo::{Area, Coord, MapCoords, MultiLineString, MultiPolygon};
use proj4rs::{proj::Proj, transform::transform};

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::feature::{RegionSet, RoadSet};

const M2_PER_KM2: f64 = 1.0e6;

/// A region carried into a projected CRS, with its area resolved (km²).
#[derive(Debug, Clone)]
pub struct ProjectedRegion {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub geometry: MultiPolygon<f64>,
    pub area_km2: f64,
}

/// Regions in a projected CRS, safe for length/area arithmetic.
#[derive(Debug, Clone)]
pub struct ProjectedRegions {
    regions: Vec<ProjectedRegion>,
    index: AHashMap<Arc<str>, usize>,
    crs: Crs,
}

impl ProjectedRegions {
    /// Number of regions.
    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    /// Check if the store is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// Projected CRS of every geometry in the store.
    #[inline] pub fn crs(&self) -> Crs { self.crs }

    /// Iterate regions in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ProjectedRegion> {
        self.regions.iter()
    }

    /// Slice access, indexed in insertion order.
    #[inline] pub fn regions(&self) -> &[ProjectedRegion] { &self.regions }

    /// Look up a region by id.
    pub fn get(&self, id: &str) -> Option<&ProjectedRegion> {
        self.index.get(id).map(|&i| &self.regions[i])
    }
}

/// A road carried into a projected CRS.
#[derive(Debug, Clone)]
pub struct ProjectedRoad {
    pub geometry: MultiLineString<f64>,
    pub category: Arc<str>,
}

/// Roads in a projected CRS, safe for length arithmetic.
#[derive(Debug, Clone)]
pub struct ProjectedRoads {
    roads: Vec<ProjectedRoad>,
    crs: Crs,
}

impl ProjectedRoads {
    /// Number of roads.
    #[inline] pub fn len(&self) -> usize { self.roads.len() }

    /// Check if the store is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.roads.is_empty() }

    /// Projected CRS of every geometry in the store.
    #[inline] pub fn crs(&self) -> Crs { self.crs }

    /// Slice access, indexed in insertion order.
    #[inline] pub fn roads(&self) -> &[ProjectedRoad] { &self.roads }
}

/// Reproject a region store into a projected CRS, resolving region areas.
///
/// Areas come from the source attribute when present, otherwise from the
/// projected geometry. Every area must be strictly positive. Reprojection to
/// the CRS the store is already in is an exact copy.
pub fn reproject_regions(set: &RegionSet, to: Crs) -> Result<ProjectedRegions> {
    require_projected(to)?;
    let same_crs = set.crs() == to;
    let projector = if same_crs { None } else { Some(Projector::new(set.crs(), to)?) };

    let mut regions = Vec::with_capacity(set.len());
    let mut index = AHashMap::with_capacity(set.len());
    for feature in set.iter() {
        let geometry = match &projector {
            None => feature.geometry.clone(),
            Some(p) => p.transform_geometry(&feature.geometry, &feature.id)?,
        };

        let area_km2 = feature.area_km2
            .unwrap_or_else(|| geometry.unsigned_area() / M2_PER_KM2);
        if !(area_km2 > 0.0) {
            return Err(Error::NonPositiveArea { region_id: feature.id.clone() });
        }

        index.insert(feature.id.clone(), regions.len());
        regions.push(ProjectedRegion {
            id: feature.id.clone(),
            name: feature.name.clone(),
            geometry,
            area_km2,
        });
    }

    Ok(ProjectedRegions { regions, index, crs: to })
}

/// Reproject a road store into a projected CRS.
///
/// Reprojection to the CRS the store is already in is an exact copy.
pub fn reproject_roads(set: &RoadSet, to: Crs) -> Result<ProjectedRoads> {
    require_projected(to)?;
    let same_crs = set.crs() == to;
    let projector = if same_crs { None } else { Some(Projector::new(set.crs(), to)?) };

    let mut roads = Vec::with_capacity(set.len());
    for (i, feature) in set.iter().enumerate() {
        let geometry = match &projector {
            None => feature.geometry.clone(),
            Some(p) => {
                let label: Arc<str> = Arc::from(format!("road[{i}]").as_str());
                p.transform_geometry(&feature.geometry, &label)?
            }
        };
        roads.push(ProjectedRoad { geometry, category: feature.category.clone() });
    }

    Ok(ProjectedRoads { roads, crs: to })
}

fn require_projected(to: Crs) -> Result<()> {
    if to.is_geographic() {
        return Err(Error::GeographicTarget { epsg: to.epsg() });
    }
    Ok(())
}

/// A prepared source → target transform.
struct Projector {
    from: Proj,
    to: Proj,
    from_geographic: bool,
}

impl Projector {
    fn new(from: Crs, to: Crs) -> Result<Self> {
        let build = |crs: Crs| -> Result<Proj> {
            let proj_string = crs.proj4()?;
            Proj::from_proj_string(&proj_string)
                .map_err(|_| Error::UnsupportedCrs { epsg: crs.epsg() })
        };
        Ok(Self {
            from: build(from)?,
            to: build(to)?,
            from_geographic: from.is_geographic(),
        })
    }

    /// Transform every coordinate of a geometry. Geographic sources are in
    /// degrees and must enter proj4rs as radians; projected output is meters.
    fn transform_geometry<G>(&self, geometry: &G, feature: &Arc<str>) -> Result<G>
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geometry.try_map_coords(|coord: Coord<f64>| {
            let mut point = if self.from_geographic {
                (coord.x.to_radians(), coord.y.to_radians(), 0.0)
            } else {
                (coord.x, coord.y, 0.0)
            };
            transform(&self.from, &self.to, &mut point).map_err(|source| Error::Projection {
                feature: feature.clone(),
                source,
            })?;
            if !point.0.is_finite() || !point.1.is_finite() {
                return Err(Error::MalformedGeometry {
                    feature: feature.clone(),
                    detail: format!(
                        "coordinate ({}, {}) left the target projection domain",
                        coord.x, coord.y
                    ),
                });
            }
            Ok(Coord { x: point.0, y: point.1 })
        })
    }
}
