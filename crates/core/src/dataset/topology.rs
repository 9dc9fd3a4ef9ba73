//! Intrinsic dimensionality of a point distribution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial distribution of the sample points.
///
/// Determines how many basis vertices linear interpolation needs: one for
/// `Point`, two for `Line`, three for `Area` and four for `Volume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Point,
    Line,
    Area,
    Volume,
}

impl Topology {
    /// Number of vertices in an interpolation basis of this topology
    #[inline]
    pub fn basis_size(self) -> usize {
        match self {
            Topology::Point => 1,
            Topology::Line => 2,
            Topology::Area => 3,
            Topology::Volume => 4,
        }
    }

    /// Check the number of locations a dataset of this topology must hold.
    ///
    /// A point distribution holds exactly one location; the others need at
    /// least as many locations as basis vertices.
    pub fn accepts(self, num_locations: usize) -> bool {
        match self {
            Topology::Point => num_locations == 1,
            _ => num_locations >= self.basis_size(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Topology::Point => "point",
            Topology::Line => "line",
            Topology::Area => "area",
            Topology::Volume => "volume",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
