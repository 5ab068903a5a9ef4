use std::sync::Arc;

use geo::{BooleanOps, BoundingRect, Euclidean, Length, MultiLineString, Validation};
use rayon::prelude::*;
use tracing::warn;

use crate::error::{Error, Result};
use crate::index::SpatialIndex;
use crate::join::CancelToken;
use crate::reproject::{ProjectedRegion, ProjectedRegions, ProjectedRoads};

const M_PER_KM: f64 = 1000.0;

/// Category selection for a join pass.
///
/// "No filtering" is the explicit [`CategoryFilter::All`] mode, never an
/// implicit default: an unfiltered pass must be visibly requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every road participates regardless of category.
    All,
    /// Only roads whose category equals the given value participate.
    Category(String),
}

impl CategoryFilter {
    /// Shorthand for `CategoryFilter::Category(name.to_string())`.
    pub fn category(name: &str) -> Self {
        CategoryFilter::Category(name.to_string())
    }

    #[inline]
    pub(crate) fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => wanted == category,
        }
    }
}

/// One (region, road) match: the road's pieces clipped to the region, and
/// their summed length. A road crossing the region boundary several times
/// still yields a single record holding all in-region pieces.
#[derive(Debug, Clone)]
pub struct IntersectionRecord {
    pub region_id: Arc<str>,
    pub category: Arc<str>,
    pub clipped: MultiLineString<f64>,
    pub length_km: f64,
}

/// A (region, road) pair dropped because one side's geometry is invalid.
#[derive(Debug, Clone)]
pub struct SkippedPair {
    pub region_id: Arc<str>,
    pub road_idx: usize,
    pub detail: &'static str,
}

/// Join result: intersection records plus every skipped pair, so partial
/// failures are counted and reportable rather than silent.
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub records: Vec<IntersectionRecord>,
    pub skipped: Vec<SkippedPair>,
}

impl JoinOutput {
    /// Number of feature pairs dropped for invalid geometry.
    #[inline] pub fn skipped_count(&self) -> usize { self.skipped.len() }
}

/// Spatially join regions against roads and clip each matching road to its
/// region.
///
/// For every region the road index is queried by bounding box, candidates
/// are narrowed by `filter`, and surviving candidates are clipped with true
/// intersection geometry; empty and zero-length clips are discarded. An
/// invalid geometry on either side drops that single pair (recorded in
/// [`JoinOutput::skipped`], warned through `tracing`) without aborting the
/// run. Regions are processed in parallel; `cancel` is honored between
/// regions.
pub fn intersection_join(
    regions: &ProjectedRegions,
    roads: &ProjectedRoads,
    index: &SpatialIndex,
    filter: &CategoryFilter,
    cancel: &CancelToken,
) -> Result<JoinOutput> {
    if regions.crs() != roads.crs() {
        return Err(Error::CrsMismatch {
            regions: regions.crs().epsg(),
            roads: roads.crs().epsg(),
        });
    }

    // Independent per-region slots, flattened afterwards in region order.
    let slots: Vec<(Vec<IntersectionRecord>, Vec<SkippedPair>)> = regions
        .regions()
        .par_iter()
        .map(|region| {
            if cancel.is_cancelled() {
                return (Vec::new(), Vec::new());
            }
            join_one_region(region, roads, index, filter)
        })
        .collect();

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let mut output = JoinOutput::default();
    for (records, skipped) in slots {
        output.records.extend(records);
        output.skipped.extend(skipped);
    }
    Ok(output)
}

fn join_one_region(
    region: &ProjectedRegion,
    roads: &ProjectedRoads,
    index: &SpatialIndex,
    filter: &CategoryFilter,
) -> (Vec<IntersectionRecord>, Vec<SkippedPair>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    let Some(rect) = region.geometry.bounding_rect() else {
        return (records, skipped);
    };
    let region_valid = region.geometry.is_valid();

    for road_idx in index.query(&rect) {
        let road = &roads.roads()[road_idx];
        if !filter.matches(&road.category) {
            continue;
        }

        let detail = if !region_valid {
            Some("invalid region geometry")
        } else if !road.geometry.is_valid() {
            Some("invalid road geometry")
        } else {
            None
        };
        if let Some(detail) = detail {
            warn!(region = %region.id, road = road_idx, detail, "skipping feature pair");
            skipped.push(SkippedPair { region_id: region.id.clone(), road_idx, detail });
            continue;
        }

        // True intersection: every in-region piece of the road at once.
        let clipped = region.geometry.clip(&road.geometry, false);
        if clipped.0.is_empty() {
            continue;
        }
        let length_km = Euclidean.length(&clipped) / M_PER_KM;
        if length_km <= 0.0 {
            continue; // bbox false positive or point touch
        }

        records.push(IntersectionRecord {
            region_id: region.id.clone(),
            category: road.category.clone(),
            clipped,
            length_km,
        });
    }

    (records, skipped)
}
