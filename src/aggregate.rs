use std::sync::Arc;

use ahash::AHashMap;

use crate::join::IntersectionRecord;
use crate::reproject::ProjectedRegions;

/// Per-region aggregate of clipped road lengths, in kilometers, with the
/// densities derived from region area (km of road per km²).
///
/// `category_*` comes from the filtered join pass, `total_*` from the
/// separate unfiltered pass; the two are never conflated.
#[derive(Debug, Clone)]
pub struct RegionMetric {
    pub region_id: Arc<str>,
    pub category_length_km: f64,
    pub total_length_km: f64,
    pub category_density: f64,
    pub total_density: f64,
}

/// Group intersection records by region and sum their lengths.
///
/// Right-join semantics: the output has exactly one metric per region of
/// `regions`, in insertion order, zero-filled for regions no record touches.
/// Summation order carries no meaning; callers must compare with tolerance.
pub fn aggregate(
    category_records: &[IntersectionRecord],
    total_records: &[IntersectionRecord],
    regions: &ProjectedRegions,
) -> Vec<RegionMetric> {
    let category_sums = sum_by_region(category_records);
    let total_sums = sum_by_region(total_records);

    regions.iter()
        .map(|region| {
            let category_length_km = category_sums.get(&region.id).copied().unwrap_or(0.0);
            let total_length_km = total_sums.get(&region.id).copied().unwrap_or(0.0);
            // area > 0 is guaranteed by ProjectedRegions.
            RegionMetric {
                region_id: region.id.clone(),
                category_length_km,
                total_length_km,
                category_density: category_length_km / region.area_km2,
                total_density: total_length_km / region.area_km2,
            }
        })
        .collect()
}

fn sum_by_region(records: &[IntersectionRecord]) -> AHashMap<Arc<str>, f64> {
    let mut sums = AHashMap::new();
    for record in records {
        *sums.entry(record.region_id.clone()).or_insert(0.0) += record.length_km;
    }
    sums
}
