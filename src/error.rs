use std::sync::Arc;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by the road-statistics pipeline.
///
/// Geometry-level problems (an invalid region/road pair) are deliberately NOT
/// represented here: they are isolated per feature pair and reported through
/// [`crate::SkippedPair`] so a single bad geometry never aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The EPSG code is not in the supported CRS table.
    #[error("unsupported CRS: EPSG:{epsg}")]
    UnsupportedCrs { epsg: u32 },

    /// Length/area arithmetic requires a projected (linear-unit) target CRS.
    #[error("EPSG:{epsg} is geographic (angular units) and cannot be a measurement target")]
    GeographicTarget { epsg: u32 },

    /// A coordinate transform failed for a specific feature.
    #[error("projection failed for feature `{feature}`: {source}")]
    Projection {
        feature: Arc<str>,
        #[source]
        source: proj4rs::errors::Error,
    },

    /// A feature's geometry is structurally unusable (non-finite coordinates,
    /// degenerate rings). Raised only where the whole run cannot proceed;
    /// per-pair cases are skipped instead.
    #[error("malformed geometry in feature `{feature}`: {detail}")]
    MalformedGeometry { feature: Arc<str>, detail: String },

    /// Region areas must be strictly positive for density to be defined.
    #[error("region `{region_id}` has non-positive area")]
    NonPositiveArea { region_id: Arc<str> },

    /// Region ids must be unique within a store.
    #[error("duplicate region id `{region_id}`")]
    DuplicateRegion { region_id: Arc<str> },

    /// A metric referenced a region absent from the region store. This is an
    /// internal-consistency violation: the aggregator guarantees it never
    /// emits ids outside the store.
    #[error("metric references unknown region `{region_id}`")]
    UnknownRegion { region_id: Arc<str> },

    /// The two sides of a join were reprojected to different CRSs.
    #[error("CRS mismatch: regions in EPSG:{regions}, roads in EPSG:{roads}")]
    CrsMismatch { regions: u32, roads: u32 },

    /// The run was cancelled through its [`crate::CancelToken`].
    #[error("run cancelled")]
    Cancelled,

    /// Tabular export failed.
    #[error(transparent)]
    Table(#[from] polars::error::PolarsError),
}
