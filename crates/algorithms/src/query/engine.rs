//! Query engine
//!
//! Answers "what are the values of these names at (x, y, z)?" against a
//! loaded [`Dataset`], either by taking the closest location or by linear
//! interpolation over the basis the topology calls for.
//!
//! Configuration (`QueryState`) and the dataset are kept apart so a facade
//! can own both without self-references. Candidate lists and weights live
//! on the stack of each `query` call, so a configured state can be shared
//! by threads querying the same dataset.

use serde::{Deserialize, Serialize};
use spatialdb_core::{Dataset, Error, Result, Topology};
use tracing::debug;

use crate::interpolation::{find_k_nearest, find_nearest, Basis, Point3, Tolerances};

/// How query values are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Values of the closest location
    Nearest,
    /// Linear interpolation over a point/segment/triangle/tetrahedron basis
    #[default]
    Linear,
}

/// Resolve value names to column indices, compared case-insensitively.
///
/// Fails on an empty request or on the first unknown name; the error lists
/// every available name.
pub fn resolve_value_names<S: AsRef<str>>(
    available: &[String],
    names: &[S],
) -> Result<Vec<usize>> {
    if names.is_empty() {
        return Err(Error::EmptyValueSelection);
    }

    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            available
                .iter()
                .position(|a| a.eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::ValueNotFound {
                    name: name.to_string(),
                    available: available.to_vec(),
                })
        })
        .collect()
}

/// Resolved value selection
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    names: Vec<String>,
    indices: Vec<usize>,
}

/// Query configuration reused across many queries
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    mode: QueryMode,
    tolerances: Tolerances,
    selection: Option<Selection>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn set_query_mode(&mut self, mode: QueryMode) {
        self.mode = mode;
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) -> Result<()> {
        tolerances.validate()?;
        self.tolerances = tolerances;
        Ok(())
    }

    /// Select the values returned by subsequent queries, in request order.
    ///
    /// The previous selection is kept if resolution fails.
    pub fn set_query_values<S: AsRef<str>>(
        &mut self,
        dataset: &Dataset,
        names: &[S],
    ) -> Result<()> {
        let indices = resolve_value_names(dataset.value_names(), names)?;
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        debug!(?names, ?indices, "query values selected");
        self.selection = Some(Selection { names, indices });
        Ok(())
    }

    /// Whether `set_query_values` has succeeded
    pub fn is_configured(&self) -> bool {
        self.selection.is_some()
    }

    /// Names of the selected values as requested
    pub fn selected_names(&self) -> Option<&[String]> {
        self.selection.as_ref().map(|s| s.names.as_slice())
    }

    /// Column indices of the selected values
    pub fn selected_indices(&self) -> Option<&[usize]> {
        self.selection.as_ref().map(|s| s.indices.as_slice())
    }

    pub fn clear_query_values(&mut self) {
        self.selection = None;
    }

    /// Fill `values` with the selected values at `point`.
    ///
    /// `values` must hold exactly one slot per selected name. On error
    /// `values` is left untouched.
    pub fn query(&self, dataset: &Dataset, values: &mut [f64], point: Point3) -> Result<()> {
        let indices = self.selected_indices().ok_or(Error::QueryValuesNotSet)?;
        if values.len() != indices.len() {
            return Err(Error::SizeMismatch {
                expected: indices.len(),
                actual: values.len(),
            });
        }
        if point.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "point",
                value: format!("({}, {}, {})", point[0], point[1], point[2]),
                reason: "query coordinates must be finite".into(),
            });
        }

        match (self.mode, dataset.topology()) {
            (QueryMode::Nearest, _) | (QueryMode::Linear, Topology::Point) => {
                query_nearest(dataset, indices, values, &point)
            }
            (QueryMode::Linear, topology) => {
                query_linear(dataset, topology, &self.tolerances, indices, values, &point)
            }
        }
    }
}

fn query_nearest(
    dataset: &Dataset,
    indices: &[usize],
    values: &mut [f64],
    point: &Point3,
) -> Result<()> {
    let nearest = find_k_nearest(dataset, point, 1);
    let row = dataset.values_at(nearest.location(0));

    for (out, &col) in values.iter_mut().zip(indices) {
        *out = row[col];
    }
    Ok(())
}

fn query_linear(
    dataset: &Dataset,
    topology: Topology,
    tol: &Tolerances,
    indices: &[usize],
    values: &mut [f64],
    point: &Point3,
) -> Result<()> {
    let candidates = find_nearest(dataset, point);
    let basis = Basis::build(topology, dataset, &candidates, point, tol)?;

    values.fill(0.0);
    for w in basis.weights() {
        let row = dataset.values_at(candidates.location(w.candidate));
        for (out, &col) in values.iter_mut().zip(indices) {
            *out += w.weight * row[col];
        }
    }
    Ok(())
}

/// Query engine bound to a dataset it does not own
#[derive(Debug, Clone)]
pub struct QueryEngine<'a> {
    dataset: &'a Dataset,
    state: QueryState,
}

impl<'a> QueryEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            state: QueryState::default(),
        }
    }

    /// Engine with an existing configuration
    pub fn with_state(dataset: &'a Dataset, state: QueryState) -> Self {
        Self { dataset, state }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn set_query_mode(&mut self, mode: QueryMode) {
        self.state.set_query_mode(mode);
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) -> Result<()> {
        self.state.set_tolerances(tolerances)
    }

    pub fn set_query_values<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.state.set_query_values(self.dataset, names)
    }

    pub fn is_configured(&self) -> bool {
        self.state.is_configured()
    }

    /// Fill `values` with the selected values at (x, y, z)
    pub fn query(&self, values: &mut [f64], x: f64, y: f64, z: f64) -> Result<()> {
        self.state.query(self.dataset, values, [x, y, z])
    }
}
