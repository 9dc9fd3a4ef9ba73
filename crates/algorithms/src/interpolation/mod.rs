//! Spatial interpolation core
//!
//! Point-cloud interpolation used to answer database queries:
//! - Nearest: distance-ordered candidate search over the dataset
//! - Basis: point/segment/triangle/tetrahedron selection with
//!   barycentric weights
//! - Geometry: distance, area and volume primitives
//! - Constants: candidate cap and tolerances

mod basis;
pub mod constants;
pub mod geometry;
mod nearest;

pub use basis::{Basis, Weight};
pub use constants::{Tolerances, DEFAULT_TOLERANCE, MAX_CANDIDATES};
pub use geometry::Point3;
pub use nearest::{find_k_nearest, find_nearest, Candidate, CandidateList};
