//! Spatial database with the same values everywhere

use spatialdb_core::{CoordSys, Error, Result};

use super::SpatialDb;
use crate::query::resolve_value_names;

/// Database returning fixed values regardless of the query point.
///
/// Any coordinate system is accepted since the point is never used.
#[derive(Debug, Clone)]
pub struct UniformDb {
    label: String,
    names: Vec<String>,
    values: Vec<f64>,
    selection: Option<Vec<usize>>,
}

impl UniformDb {
    pub fn new(label: impl Into<String>, names: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(Error::InvalidParameter {
                name: "values",
                value: values.len().to_string(),
                reason: format!("expected {} values, one per name", names.len()),
            });
        }
        Ok(Self {
            label: label.into(),
            names,
            values,
            selection: None,
        })
    }

    pub fn value_names(&self) -> &[String] {
        &self.names
    }
}

impl SpatialDb for UniformDb {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}

    fn set_query_values(&mut self, names: &[&str]) -> Result<()> {
        self.selection = Some(resolve_value_names(&self.names, names)?);
        Ok(())
    }

    fn query_value_count(&self) -> Option<usize> {
        self.selection.as_ref().map(Vec::len)
    }

    fn query(&self, values: &mut [f64], _point: [f64; 3], _coord_sys: &CoordSys) -> Result<()> {
        let selection = self.selection.as_ref().ok_or(Error::QueryValuesNotSet)?;
        if values.len() != selection.len() {
            return Err(Error::SizeMismatch {
                expected: selection.len(),
                actual: values.len(),
            });
        }
        for (out, &i) in values.iter_mut().zip(selection) {
            *out = self.values[i];
        }
        Ok(())
    }
}
