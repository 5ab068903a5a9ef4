//! Final output table: aggregated metrics merged with region metadata.

use polars::prelude::*;
use serde::Serialize;

use crate::aggregate::RegionMetric;
use crate::error::{Error, Result};
use crate::reproject::ProjectedRegions;

/// One output row per region: metric values merged with region metadata.
/// Lengths are kilometers, densities km per km².
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub region_id: String,
    pub name: String,
    pub area_km2: f64,
    pub category_length_km: f64,
    pub total_length_km: f64,
    pub category_density: f64,
    pub total_density: f64,
}

/// Row ordering for [`ResultTable::sorted_by`]. Numeric keys sort
/// descending (largest first), `Name` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortKey {
    /// Keep the insertion order of the region store.
    Insertion,
    Name,
    CategoryLength,
    TotalLength,
    Density,
}

/// The assembled per-region result table.
#[derive(Debug, Clone)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Merge aggregated metrics with region metadata, one row per region in
    /// metric order (the aggregator emits region-store insertion order).
    ///
    /// A metric referencing an id outside the region store is an
    /// internal-consistency bug and fails with [`Error::UnknownRegion`].
    pub fn assemble(metrics: &[RegionMetric], regions: &ProjectedRegions) -> Result<Self> {
        debug_assert_eq!(metrics.len(), regions.len(), "aggregator must cover every region");

        let rows = metrics.iter()
            .map(|metric| {
                let region = regions.get(&metric.region_id).ok_or_else(|| Error::UnknownRegion {
                    region_id: metric.region_id.clone(),
                })?;
                Ok(ResultRow {
                    region_id: metric.region_id.to_string(),
                    name: region.name.to_string(),
                    area_km2: region.area_km2,
                    category_length_km: metric.category_length_km,
                    total_length_km: metric.total_length_km,
                    category_density: metric.category_density,
                    total_density: metric.total_density,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Number of rows (== number of regions).
    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    /// Check if the table is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Row access in current order.
    #[inline] pub fn rows(&self) -> &[ResultRow] { &self.rows }

    /// Reorder rows by the given key.
    pub fn sorted_by(mut self, key: SortKey) -> Self {
        match key {
            SortKey::Insertion => {}
            SortKey::Name => self.rows.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::CategoryLength => self.rows
                .sort_by(|a, b| b.category_length_km.total_cmp(&a.category_length_km)),
            SortKey::TotalLength => self.rows
                .sort_by(|a, b| b.total_length_km.total_cmp(&a.total_length_km)),
            SortKey::Density => self.rows
                .sort_by(|a, b| b.category_density.total_cmp(&a.category_density)),
        }
        self
    }

    /// The `n` regions with the largest total length, plus one remainder
    /// bucket summing all others (present only when rows are left over).
    /// Feeds share-of-network style summaries.
    pub fn top_by_total(&self, n: usize, remainder_label: &str) -> Vec<(String, f64)> {
        let mut ordered: Vec<&ResultRow> = self.rows.iter().collect();
        ordered.sort_by(|a, b| b.total_length_km.total_cmp(&a.total_length_km));

        let mut out: Vec<(String, f64)> = ordered.iter()
            .take(n)
            .map(|row| (row.name.clone(), row.total_length_km))
            .collect();
        if ordered.len() > n {
            let rest: f64 = ordered[n..].iter().map(|row| row.total_length_km).sum();
            out.push((remainder_label.to_string(), rest));
        }
        out
    }

    /// Materialize the table as a polars DataFrame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = df![
            "region_id" => self.rows.iter().map(|r| r.region_id.clone()).collect::<Vec<_>>(),
            "name" => self.rows.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
            "area_km2" => self.rows.iter().map(|r| r.area_km2).collect::<Vec<_>>(),
            "category_length_km" => self.rows.iter().map(|r| r.category_length_km).collect::<Vec<_>>(),
            "total_length_km" => self.rows.iter().map(|r| r.total_length_km).collect::<Vec<_>>(),
            "category_density" => self.rows.iter().map(|r| r.category_density).collect::<Vec<_>>(),
            "total_density" => self.rows.iter().map(|r| r.total_density).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }

    /// Serialize the table to a CSV string.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut df = self.to_dataframe()?;
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer).finish(&mut df)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
