//! Per-region road network length and density statistics.
//!
//! Given a set of administrative region polygons and a road-segment line
//! network (which share no tabular key), this crate spatially joins the two,
//! clips each road to the regions it crosses, sums clipped lengths in a
//! projected CRS, and produces one output row per region with category
//! length, total length, and density.
//!
//! ```no_run
//! use roadstats::{CategoryFilter, PipelineOptions, RegionSet, RoadSet};
//!
//! fn stats(regions: &RegionSet, roads: &RoadSet) -> roadstats::Result<()> {
//!     let output = roadstats::run(
//!         regions,
//!         roads,
//!         &CategoryFilter::category("primary"),
//!         &PipelineOptions::default(),
//!     )?;
//!     println!("{}", output.table.to_csv_string()?);
//!     Ok(())
//! }
//! ```

mod aggregate;
mod crs;
mod error;
mod feature;
mod index;
mod join;
mod pipeline;
mod reproject;
mod table;

#[doc(inline)]
pub use crs::Crs;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use feature::{RegionFeature, RegionSet, RoadFeature, RoadSet};

#[doc(inline)]
pub use reproject::{
    ProjectedRegion, ProjectedRegions, ProjectedRoad, ProjectedRoads, reproject_regions,
    reproject_roads,
};

#[doc(inline)]
pub use index::SpatialIndex;

#[doc(inline)]
pub use join::{
    CancelToken, CategoryFilter, IntersectionRecord, JoinOutput, SkippedPair, intersection_join,
};

#[doc(inline)]
pub use aggregate::{RegionMetric, aggregate};

#[doc(inline)]
pub use table::{ResultRow, ResultTable, SortKey};

#[doc(inline)]
pub use pipeline::{PipelineOptions, PipelineOutput, run};
