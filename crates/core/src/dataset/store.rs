//! In-memory point store

use crate::coordsys::CoordSys;
use crate::dataset::Topology;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};

/// A loaded point dataset.
///
/// Holds `num_locations` sample points, each with an (x, y, z) coordinate and
/// `num_values` named values, plus the topology of the distribution. Once
/// built it is never mutated; queries only read from it.
///
/// # Example
///
/// ```ignore
/// use spatialdb_core::{Dataset, Topology};
///
/// let ds = Dataset::from_flat(
///     vec!["v".into()],
///     &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
///     vec![10.0, 20.0],
///     Topology::Line,
/// )?;
/// assert_eq!(ds.values_at(1)[0], 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    coords: Vec<[f64; 3]>,
    /// Values in row-major order (location, value)
    values: Array2<f64>,
    topology: Topology,
    coord_sys: CoordSys,
}

impl Dataset {
    /// Create a dataset from per-location coordinates and a value matrix.
    ///
    /// `values` must have one row per location and one column per name.
    pub fn new(
        names: Vec<String>,
        coords: Vec<[f64; 3]>,
        values: Array2<f64>,
        topology: Topology,
    ) -> Result<Self> {
        let num_locations = coords.len();

        if num_locations == 0 {
            return Err(Error::InvalidDataset("dataset has no locations".into()));
        }
        if values.dim() != (num_locations, names.len()) {
            let (rows, cols) = values.dim();
            return Err(Error::InvalidDataset(format!(
                "value matrix is {}x{}, expected {}x{}",
                rows,
                cols,
                num_locations,
                names.len()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].iter().any(|n| n.eq_ignore_ascii_case(name)) {
                return Err(Error::InvalidDataset(format!(
                    "duplicate value name '{}'",
                    name
                )));
            }
        }
        if !topology.accepts(num_locations) {
            return Err(Error::InvalidDataset(format!(
                "{} topology is incompatible with {} location(s)",
                topology, num_locations
            )));
        }

        Ok(Self {
            names,
            coords,
            values,
            topology,
            coord_sys: CoordSys::default(),
        })
    }

    /// Create a dataset from flat arrays.
    ///
    /// `coords` holds contiguous (x, y, z) triples and `values` holds
    /// `num_values` entries per location, in location order.
    pub fn from_flat(
        names: Vec<String>,
        coords: &[f64],
        values: Vec<f64>,
        topology: Topology,
    ) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(Error::InvalidDataset(format!(
                "coordinate array length {} is not a multiple of 3",
                coords.len()
            )));
        }
        let num_locations = coords.len() / 3;
        let coords: Vec<[f64; 3]> = coords
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        let values = Array2::from_shape_vec((num_locations, names.len()), values)
            .map_err(|e| Error::InvalidDataset(e.to_string()))?;

        Self::new(names, coords, values, topology)
    }

    /// Tag the dataset with the coordinate system its points are expressed in
    pub fn with_coord_sys(mut self, coord_sys: CoordSys) -> Self {
        self.coord_sys = coord_sys;
        self
    }

    #[inline]
    pub fn num_locations(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn num_values(&self) -> usize {
        self.names.len()
    }

    pub fn value_names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn coord_sys(&self) -> &CoordSys {
        &self.coord_sys
    }

    /// Coordinates of location `index`.
    ///
    /// Panics if `index >= num_locations()`.
    #[inline]
    pub fn coords_at(&self, index: usize) -> &[f64; 3] {
        debug_assert!(index < self.coords.len(), "location index out of range");
        &self.coords[index]
    }

    /// Values of location `index`, in `value_names()` order.
    ///
    /// Panics if `index >= num_locations()`.
    #[inline]
    pub fn values_at(&self, index: usize) -> ArrayView1<'_, f64> {
        debug_assert!(index < self.coords.len(), "location index out of range");
        self.values.row(index)
    }

    /// Index of a value column, compared case-insensitively
    pub fn value_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    /// Iterate over (coordinates, values) of every location in storage order
    pub fn iter(&self) -> impl Iterator<Item = (&[f64; 3], ArrayView1<'_, f64>)> + '_ {
        self.coords.iter().zip(self.values.rows())
    }
}
