//! Point dataset types

mod store;
mod topology;

pub use store::Dataset;
pub use topology::Topology;
