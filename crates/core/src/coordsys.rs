//! Coordinate system tag
//!
//! The query core never converts coordinates. A `CoordSys` only records what
//! frame a dataset (or a query point) is expressed in, so callers can detect
//! points that skipped the conversion step.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate system representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordSys {
    /// Number of spatial dimensions (1, 2 or 3)
    space_dim: usize,
    /// EPSG code if known
    epsg: Option<u32>,
    /// PROJ string if available
    proj: Option<String>,
    /// Length unit name for local Cartesian frames
    units: Option<String>,
}

impl CoordSys {
    /// Local Cartesian frame with the given dimension and length units
    pub fn cartesian(space_dim: usize, units: impl Into<String>) -> Self {
        Self {
            space_dim,
            epsg: None,
            proj: None,
            units: Some(units.into()),
        }
    }

    /// Geographic or projected frame from an EPSG code
    pub fn from_epsg(code: u32, space_dim: usize) -> Self {
        Self {
            space_dim,
            epsg: Some(code),
            proj: None,
            units: None,
        }
    }

    /// Frame described by a PROJ string
    pub fn from_proj(proj: impl Into<String>, space_dim: usize) -> Self {
        Self {
            space_dim,
            epsg: None,
            proj: Some(proj.into()),
            units: None,
        }
    }

    pub fn space_dim(&self) -> usize {
        self.space_dim
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Check whether points in `other` can be used directly in this frame.
    ///
    /// Dimensions must agree. EPSG codes are compared first, then PROJ
    /// strings, then Cartesian units (case-insensitive).
    pub fn is_compatible(&self, other: &CoordSys) -> bool {
        if self.space_dim != other.space_dim {
            return false;
        }
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.units, &other.units) {
            return a.eq_ignore_ascii_case(b);
        }
        false
    }

    /// Get a string identifier for this coordinate system
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        if let Some(units) = &self.units {
            return format!("cartesian-{}d[{}]", self.space_dim, units);
        }
        "unknown".to_string()
    }
}

impl fmt::Display for CoordSys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CoordSys {
    fn default() -> Self {
        Self::cartesian(3, "m")
    }
}
