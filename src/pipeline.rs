//! End-to-end batch pipeline: reproject → index → join (two explicit
//! passes) → aggregate → assemble.

use geo::BoundingRect;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::crs::Crs;
use crate::error::Result;
use crate::feature::{RegionSet, RoadSet};
use crate::index::SpatialIndex;
use crate::join::{CancelToken, CategoryFilter, SkippedPair, intersection_join};
use crate::reproject::{reproject_regions, reproject_roads};
use crate::table::ResultTable;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Projected CRS in which all measurement happens.
    pub metric_crs: Crs,
    /// Cancellation token checked between region iterations.
    pub cancel: CancelToken,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { metric_crs: Crs::ETRS89_LAEA, cancel: CancelToken::new() }
    }
}

/// Pipeline result: the per-region table plus every feature pair skipped in
/// either join pass.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: ResultTable,
    pub category_skipped: Vec<SkippedPair>,
    pub total_skipped: Vec<SkippedPair>,
}

impl PipelineOutput {
    /// Total skipped pairs across both join passes.
    #[inline]
    pub fn skipped_pair_count(&self) -> usize {
        self.category_skipped.len() + self.total_skipped.len()
    }
}

/// Run the full pipeline for one category selection.
///
/// Both inputs are reprojected to `options.metric_crs`, the road index is
/// built once, and two independent joins run over it: the filtered pass
/// feeding `category_*` and an explicit unfiltered pass feeding `total_*`.
/// `total_*` therefore always covers every category, whatever the filter.
///
/// A filter matching no roads is not an error: the table still has one row
/// per region, all category values zero.
pub fn run(
    regions: &RegionSet,
    roads: &RoadSet,
    filter: &CategoryFilter,
    options: &PipelineOptions,
) -> Result<PipelineOutput> {
    debug!(
        regions = regions.len(),
        roads = roads.len(),
        epsg = options.metric_crs.epsg(),
        "reprojecting inputs"
    );
    let regions = reproject_regions(regions, options.metric_crs)?;
    let roads = reproject_roads(roads, options.metric_crs)?;

    let index = SpatialIndex::build(roads.roads().iter().map(|r| r.geometry.bounding_rect()));
    debug!(indexed = index.len(), "road index built");

    let category_pass = intersection_join(&regions, &roads, &index, filter, &options.cancel)?;
    let total_pass =
        intersection_join(&regions, &roads, &index, &CategoryFilter::All, &options.cancel)?;

    let metrics = aggregate(&category_pass.records, &total_pass.records, &regions);
    let table = ResultTable::assemble(&metrics, &regions)?;

    info!(
        rows = table.len(),
        skipped = category_pass.skipped_count() + total_pass.skipped_count(),
        "pipeline complete"
    );
    Ok(PipelineOutput {
        table,
        category_skipped: category_pass.skipped,
        total_skipped: total_pass.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{RegionFeature, RoadFeature};
    use geo::{line_string, polygon};

    const TOL: f64 = 1e-6;

    /// Axis-aligned rectangle in meters (EPSG:3035 plane).
    fn block(x0: f64, x1: f64, y0: f64, y1: f64) -> geo::Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
            (x: x0, y: y0),
        ]
    }

    fn region_set(features: Vec<RegionFeature>) -> RegionSet {
        RegionSet::new(features, Crs::ETRS89_LAEA).unwrap()
    }

    fn road_set(features: Vec<RoadFeature>) -> RoadSet {
        RoadSet::new(features, Crs::ETRS89_LAEA)
    }

    #[test]
    fn contained_road_scenario() {
        // 10 km x 10 km region (100 km²) fully containing a straight 10 km
        // primary road: length 10, density 0.1, other categories zero.
        let regions = region_set(vec![
            RegionFeature::new("101", "Alpha", block(0.0, 10_000.0, 0.0, 10_000.0)),
        ]);
        let roads = road_set(vec![RoadFeature::new(
            line_string![(x: 0.0, y: 5_000.0), (x: 10_000.0, y: 5_000.0)],
            "primary",
        )]);

        let output = run(
            &regions, &roads,
            &CategoryFilter::category("primary"),
            &PipelineOptions::default(),
        )
        .unwrap();
        let row = &output.table.rows()[0];
        assert!((row.area_km2 - 100.0).abs() < TOL);
        assert!((row.category_length_km - 10.0).abs() < TOL);
        assert!((row.category_density - 0.1).abs() < TOL);
        assert!((row.total_length_km - 10.0).abs() < TOL);

        // A category no road carries: all-zero category metrics, same total.
        let other = run(
            &regions, &roads,
            &CategoryFilter::category("secondary"),
            &PipelineOptions::default(),
        )
        .unwrap();
        let row = &other.table.rows()[0];
        assert_eq!(row.category_length_km, 0.0);
        assert_eq!(row.category_density, 0.0);
        assert!((row.total_length_km - 10.0).abs() < TOL);
    }

    #[test]
    fn border_straddling_road_splits_six_four() {
        let regions = region_set(vec![
            RegionFeature::new("A", "West", block(0.0, 6_000.0, 0.0, 10_000.0)),
            RegionFeature::new("B", "East", block(6_000.0, 10_000.0, 0.0, 10_000.0)),
        ]);
        let roads = road_set(vec![RoadFeature::new(
            line_string![(x: 0.0, y: 500.0), (x: 10_000.0, y: 500.0)],
            "primary",
        )]);

        let output = run(
            &regions, &roads,
            &CategoryFilter::category("primary"),
            &PipelineOptions::default(),
        )
        .unwrap();

        let west = &output.table.rows()[0];
        let east = &output.table.rows()[1];
        assert!((west.category_length_km - 6.0).abs() < TOL);
        assert!((east.category_length_km - 4.0).abs() < TOL);

        // Length additivity: split pieces sum to the road's full length.
        let total = west.category_length_km + east.category_length_km;
        assert!((total - 10.0).abs() < TOL);
    }

    #[test]
    fn right_join_keeps_regions_without_roads() {
        let regions = region_set(vec![
            RegionFeature::new("A", "Near", block(0.0, 10_000.0, 0.0, 10_000.0)),
            RegionFeature::new("B", "Far", block(100_000.0, 110_000.0, 0.0, 10_000.0)),
        ]);
        let roads = road_set(vec![RoadFeature::new(
            line_string![(x: 0.0, y: 5_000.0), (x: 10_000.0, y: 5_000.0)],
            "primary",
        )]);

        let output = run(
            &regions, &roads,
            &CategoryFilter::category("primary"),
            &PipelineOptions::default(),
        )
        .unwrap();
        assert_eq!(output.table.len(), 2, "one row per input region, always");

        let far = &output.table.rows()[1];
        assert_eq!(far.region_id, "B");
        assert_eq!(far.category_length_km, 0.0);
        assert_eq!(far.category_density, 0.0);
        assert_eq!(far.total_length_km, 0.0);
    }

    #[test]
    fn category_isolation_partitions_total() {
        let regions = region_set(vec![
            RegionFeature::new("101", "Alpha", block(0.0, 10_000.0, 0.0, 10_000.0)),
        ]);
        let roads = road_set(vec![
            RoadFeature::new(line_string![(x: 0.0, y: 1_000.0), (x: 10_000.0, y: 1_000.0)], "primary"),
            RoadFeature::new(line_string![(x: 0.0, y: 2_000.0), (x: 4_000.0, y: 2_000.0)], "secondary"),
        ]);

        let mut category_sum = 0.0;
        let mut total = None;
        for category in roads.categories() {
            let output = run(
                &regions, &roads,
                &CategoryFilter::category(&category),
                &PipelineOptions::default(),
            )
            .unwrap();
            let row = &output.table.rows()[0];
            category_sum += row.category_length_km;
            total = Some(row.total_length_km);
        }

        // Categories partition the road set, so per-category lengths must
        // sum to the unfiltered total: nothing dropped, nothing counted twice.
        assert!((category_sum - total.unwrap()).abs() < TOL);
        assert!((category_sum - 14.0).abs() < TOL);
    }

    #[test]
    fn geographic_inputs_are_reprojected_before_measuring() {
        // Degree-space inputs around the EPSG:3035 projection center; the
        // resulting lengths must be metric, not angular.
        let regions = region_set_wgs84();
        let roads = RoadSet::new(
            vec![RoadFeature::new(
                line_string![(x: 9.9, y: 52.0), (x: 10.1, y: 52.0)],
                "primary",
            )],
            Crs::WGS84,
        );

        let output = run(
            &regions, &roads,
            &CategoryFilter::category("primary"),
            &PipelineOptions::default(),
        )
        .unwrap();
        let row = &output.table.rows()[0];
        // ~0.2 degrees of longitude at lat 52 is ~13.7 km.
        assert!(row.category_length_km > 10.0 && row.category_length_km < 16.0,
            "length was {} km", row.category_length_km);
    }

    fn region_set_wgs84() -> RegionSet {
        RegionSet::new(
            vec![RegionFeature::new("101", "Alpha", block(9.5, 10.5, 51.5, 52.5))],
            Crs::WGS84,
        )
        .unwrap()
    }
}
