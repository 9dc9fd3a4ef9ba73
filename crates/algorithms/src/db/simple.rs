//! Point-cloud spatial database

use spatialdb_core::{CoordSys, Dataset, DatasetSource, Error, Result};
use tracing::debug;

use super::SpatialDb;
use crate::interpolation::Tolerances;
use crate::query::{QueryEngine, QueryMode, QueryState};

/// Spatial database backed by a point dataset.
///
/// The dataset is loaded from its source on `open` and dropped on `close`.
/// Query mode, tolerances and the value selection survive a close; the
/// selection is re-resolved against the dataset on the next `open`.
pub struct SimpleDb {
    label: String,
    source: Box<dyn DatasetSource>,
    dataset: Option<Dataset>,
    state: QueryState,
}

impl SimpleDb {
    pub fn new(label: impl Into<String>, source: impl DatasetSource + 'static) -> Self {
        Self {
            label: label.into(),
            source: Box::new(source),
            dataset: None,
            state: QueryState::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.dataset.is_some()
    }

    /// Loaded dataset, if open
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn query_mode(&self) -> QueryMode {
        self.state.mode()
    }

    pub fn set_query_mode(&mut self, mode: QueryMode) {
        self.state.set_query_mode(mode);
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) -> Result<()> {
        self.state.set_tolerances(tolerances)
    }

    /// Engine borrowing the open dataset with the current configuration
    pub fn engine(&self) -> Result<QueryEngine<'_>> {
        let dataset = self.opened()?;
        Ok(QueryEngine::with_state(dataset, self.state.clone()))
    }

    fn opened(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| Error::DatabaseClosed(self.label.clone()))
    }
}

impl std::fmt::Debug for SimpleDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleDb")
            .field("label", &self.label)
            .field("open", &self.is_open())
            .field("state", &self.state)
            .finish()
    }
}

impl SpatialDb for SimpleDb {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&mut self) -> Result<()> {
        let dataset = self.source.read()?;

        if let Some(names) = self.state.selected_names().map(<[String]>::to_vec) {
            self.state.set_query_values(&dataset, &names[..])?;
        }

        debug!(
            db = %self.label,
            locations = dataset.num_locations(),
            values = dataset.num_values(),
            topology = %dataset.topology(),
            "spatial database opened"
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    fn close(&mut self) {
        if self.dataset.take().is_some() {
            debug!(db = %self.label, "spatial database closed");
        }
    }

    fn set_query_values(&mut self, names: &[&str]) -> Result<()> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| Error::DatabaseClosed(self.label.clone()))?;
        self.state.set_query_values(dataset, names)
    }

    fn query_value_count(&self) -> Option<usize> {
        self.state.selected_indices().map(<[usize]>::len)
    }

    fn query(&self, values: &mut [f64], point: [f64; 3], coord_sys: &CoordSys) -> Result<()> {
        let dataset = self.opened()?;
        if !dataset.coord_sys().is_compatible(coord_sys) {
            return Err(Error::CoordSysMismatch(
                coord_sys.identifier(),
                dataset.coord_sys().identifier(),
            ));
        }
        self.state.query(dataset, values, point)
    }
}
