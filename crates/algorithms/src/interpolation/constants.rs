//! Numeric constants and tolerances shared by the interpolation core

use serde::{Deserialize, Serialize};
use spatialdb_core::{Error, Result};

/// Maximum number of nearest candidates considered for a basis
pub const MAX_CANDIDATES: usize = 100;

/// Default tolerance for extrapolation and degeneracy checks
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

/// Distance stored in candidate slots that were never filled
pub const UNUSED_DISTANCE: f64 = f64::INFINITY;

/// Tolerances controlling basis acceptance.
///
/// - `weight`: a basis is accepted when every weight is `>= -weight`.
///   Admits points on (or numerically just outside) the simplex boundary
///   and rejects extrapolation.
/// - `degeneracy`: a triangle is rejected unless its area exceeds
///   `degeneracy * |AB|^2`, a tetrahedron unless its volume exceeds
///   `degeneracy * |AB|^3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub weight: f64,
    pub degeneracy: f64,
}

impl Tolerances {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_degeneracy(mut self, degeneracy: f64) -> Self {
        self.degeneracy = degeneracy;
        self
    }

    /// Both tolerances must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("weight", self.weight), ("degeneracy", self.degeneracy)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "tolerance must be finite and non-negative".into(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            weight: DEFAULT_TOLERANCE,
            degeneracy: DEFAULT_TOLERANCE,
        }
    }
}
