//! Arithmetic filters between two spatial databases

use serde::{Deserialize, Serialize};
use spatialdb_core::{CoordSys, Error, Result};

use tracing::warn;

use super::SpatialDb;

/// Binary operation applied as `base <op> modifier`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl FilterOp {
    /// Combine two values. Returns `None` when dividing by zero.
    pub fn apply(self, base: f64, modifier: f64) -> Option<f64> {
        match self {
            FilterOp::Add => Some(base + modifier),
            FilterOp::Subtract => Some(base - modifier),
            FilterOp::Multiply => Some(base * modifier),
            FilterOp::Divide if modifier == 0.0 => None,
            FilterOp::Divide => Some(base / modifier),
        }
    }
}

#[derive(Debug, Clone)]
struct Target {
    slot: usize,
    name: String,
    op: FilterOp,
}

/// Database whose values are another database's values combined, by name,
/// with the values of a modifier database at the same point.
///
/// Names without a rule pass through unchanged.
pub struct FilteredDb {
    label: String,
    base: Box<dyn SpatialDb>,
    modifier: Box<dyn SpatialDb>,
    rules: Vec<(String, FilterOp)>,
    targets: Option<(usize, Vec<Target>)>,
    /// Names currently selected on the base database
    selected: Vec<String>,
}

impl FilteredDb {
    pub fn new(
        label: impl Into<String>,
        base: impl SpatialDb + 'static,
        modifier: impl SpatialDb + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            base: Box::new(base),
            modifier: Box::new(modifier),
            rules: Vec::new(),
            targets: None,
            selected: Vec::new(),
        }
    }

    /// Combine value `name` with the modifier's value of the same name
    pub fn with_rule(mut self, name: impl Into<String>, op: FilterOp) -> Self {
        self.rules.push((name.into(), op));
        self.targets = None;
        self
    }

    /// Put the base database back on the selection the current targets expect.
    ///
    /// If that fails the filter becomes unconfigured rather than combining
    /// the wrong values.
    fn restore_base(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let names: Vec<&str> = self.selected.iter().map(String::as_str).collect();
        if self.base.set_query_values(&names).is_err() {
            warn!(db = %self.label, "could not restore previous selection");
            self.targets = None;
        }
    }

    fn rule(&self, name: &str) -> Option<FilterOp> {
        self.rules
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, op)| *op)
    }
}

impl SpatialDb for FilteredDb {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&mut self) -> Result<()> {
        self.base.open()?;
        if let Err(e) = self.modifier.open() {
            self.base.close();
            return Err(e);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.base.close();
        self.modifier.close();
    }

    fn set_query_values(&mut self, names: &[&str]) -> Result<()> {
        self.base.set_query_values(names)?;

        let targets: Vec<Target> = names
            .iter()
            .enumerate()
            .filter_map(|(slot, &name)| {
                self.rule(name).map(|op| Target {
                    slot,
                    name: name.to_string(),
                    op,
                })
            })
            .collect();

        if !targets.is_empty() {
            let modified: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
            if let Err(e) = self.modifier.set_query_values(&modified) {
                self.restore_base();
                return Err(e);
            }
        }
        self.selected = names.iter().map(|n| n.to_string()).collect();
        self.targets = Some((names.len(), targets));
        Ok(())
    }

    fn query_value_count(&self) -> Option<usize> {
        self.targets.as_ref().map(|(count, _)| *count)
    }

    fn query(&self, values: &mut [f64], point: [f64; 3], coord_sys: &CoordSys) -> Result<()> {
        let (count, targets) = self.targets.as_ref().ok_or(Error::QueryValuesNotSet)?;
        if values.len() != *count {
            return Err(Error::SizeMismatch {
                expected: *count,
                actual: values.len(),
            });
        }

        let mut result = vec![0.0; *count];
        self.base.query(&mut result, point, coord_sys)?;

        if !targets.is_empty() {
            let mut modifier = vec![0.0; targets.len()];
            self.modifier.query(&mut modifier, point, coord_sys)?;

            for (target, &m) in targets.iter().zip(&modifier) {
                let slot = &mut result[target.slot];
                *slot = target.op.apply(*slot, m).ok_or_else(|| Error::InvalidParameter {
                    name: "modifier",
                    value: m.to_string(),
                    reason: format!("division by zero for value '{}'", target.name),
                })?;
            }
        }

        values.copy_from_slice(&result);
        Ok(())
    }
}
