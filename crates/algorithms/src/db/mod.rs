//! Spatial database facades
//!
//! - `SimpleDb`: point-cloud database queried through the interpolation core
//! - `UniformDb`: the same values everywhere
//! - `CompositeDb`: splices values from two databases by name
//! - `FilteredDb`: combines a database's values with another source's

mod composite;
mod filter;
mod simple;
mod uniform;

pub use composite::CompositeDb;
pub use filter::{FilterOp, FilteredDb};
pub use simple::SimpleDb;
pub use uniform::UniformDb;

use crate::maybe_rayon::*;
use ndarray::{Array2, ArrayView1};
use spatialdb_core::{CoordSys, Error, Result};
use tracing::warn;

/// A queryable source of spatially distributed values.
///
/// Typical use: `open`, `set_query_values` once, then `query` (or
/// `multiquery`) many times, then `close`.
pub trait SpatialDb: Send + Sync {
    /// Human-readable label used in logs and errors
    fn label(&self) -> &str;

    /// Prepare the database for queries
    fn open(&mut self) -> Result<()>;

    /// Release loaded data
    fn close(&mut self);

    /// Select the values returned by subsequent queries, in request order
    fn set_query_values(&mut self, names: &[&str]) -> Result<()>;

    /// Number of selected values, `None` before `set_query_values`
    fn query_value_count(&self) -> Option<usize>;

    /// Fill `values` with the selected values at `point`.
    ///
    /// `point` is expressed in `coord_sys`; no conversion is performed. On
    /// error `values` is left untouched.
    fn query(&self, values: &mut [f64], point: [f64; 3], coord_sys: &CoordSys) -> Result<()>;

    /// Whether queries can be issued
    fn is_configured(&self) -> bool {
        self.query_value_count().is_some()
    }

    /// Query many points at once.
    ///
    /// `values` must have one row per point and one column per selected
    /// value. Each point is answered independently: a failed point leaves
    /// its row as NaN and its error in the returned vector.
    fn multiquery(
        &self,
        values: &mut Array2<f64>,
        points: &[[f64; 3]],
        coord_sys: &CoordSys,
    ) -> Result<Vec<Result<()>>> {
        let count = self.query_value_count().ok_or(Error::QueryValuesNotSet)?;
        if values.nrows() != points.len() {
            return Err(Error::SizeMismatch {
                expected: points.len(),
                actual: values.nrows(),
            });
        }
        if values.ncols() != count {
            return Err(Error::SizeMismatch {
                expected: count,
                actual: values.ncols(),
            });
        }

        let rows: Vec<(Vec<f64>, Result<()>)> = points
            .into_par_iter()
            .map(|point| {
                let mut row = vec![f64::NAN; count];
                let status = self.query(&mut row, *point, coord_sys);
                (row, status)
            })
            .collect();

        let mut statuses = Vec::with_capacity(rows.len());
        for (mut dst, (row, status)) in values.rows_mut().into_iter().zip(rows) {
            dst.assign(&ArrayView1::from(&row[..]));
            statuses.push(status);
        }

        let failed = statuses.iter().filter(|s| s.is_err()).count();
        if failed > 0 {
            warn!(db = self.label(), failed, total = points.len(), "multiquery had failures");
        }
        Ok(statuses)
    }
}
