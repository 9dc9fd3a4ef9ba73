//! # SpatialDB Algorithms
//!
//! Query algorithms for spatially distributed property databases.
//!
//! ## Modules
//!
//! - **interpolation**: nearest-neighbor candidate search, basis selection
//!   and barycentric weights for point/line/area/volume distributions
//! - **query**: value selection and query dispatch over a loaded dataset
//! - **db**: database facades (simple, uniform, composite, filtered)

pub mod db;
pub mod interpolation;
mod maybe_rayon;
pub mod query;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::db::{CompositeDb, FilterOp, FilteredDb, SimpleDb, SpatialDb, UniformDb};
    pub use crate::interpolation::{Tolerances, MAX_CANDIDATES};
    pub use crate::query::{QueryEngine, QueryMode, QueryState};
    pub use spatialdb_core::prelude::*;
}
