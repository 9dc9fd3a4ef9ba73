//! # SpatialDB Core
//!
//! Data model for spatially distributed property databases.
//!
//! This crate provides:
//! - `Dataset`: in-memory point store (coordinates + named values + topology)
//! - `Topology`: intrinsic dimensionality of the point distribution
//! - `CoordSys`: coordinate system tag attached to datasets and query points
//! - `DatasetSource`: the seam through which a loaded dataset is handed over
//! - `Error`/`Result`: the error type shared by every spatial database crate

pub mod coordsys;
pub mod dataset;
pub mod error;
pub mod source;

pub use coordsys::CoordSys;
pub use dataset::{Dataset, Topology};
pub use error::{Error, Result};
pub use source::{DatasetSource, MemorySource};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::coordsys::CoordSys;
    pub use crate::dataset::{Dataset, Topology};
    pub use crate::error::{Error, Result};
    pub use crate::source::{DatasetSource, MemorySource};
}
