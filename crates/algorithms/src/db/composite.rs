//! Composite of two spatial databases

use spatialdb_core::{CoordSys, Error, Result};

use tracing::warn;

use super::SpatialDb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Where a requested value comes from: which database and which slot of
/// that database's result buffer
#[derive(Debug, Clone, Copy)]
struct Route {
    side: Side,
    slot: usize,
}

/// Database answering each value name from one of two databases.
///
/// Names listed for database A take precedence over those listed for B.
pub struct CompositeDb {
    label: String,
    db_a: Box<dyn SpatialDb>,
    names_a: Vec<String>,
    db_b: Box<dyn SpatialDb>,
    names_b: Vec<String>,
    routes: Option<Vec<Route>>,
    /// Names currently selected on each child, in slot order
    selected: (Vec<String>, Vec<String>),
}

impl CompositeDb {
    pub fn new(
        label: impl Into<String>,
        db_a: impl SpatialDb + 'static,
        names_a: Vec<String>,
        db_b: impl SpatialDb + 'static,
        names_b: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            db_a: Box::new(db_a),
            names_a,
            db_b: Box::new(db_b),
            names_b,
            routes: None,
            selected: (Vec::new(), Vec::new()),
        }
    }

    /// Put database A back on the selection the current routes expect.
    ///
    /// If that fails the composite becomes unconfigured rather than routing
    /// A's new values into the old slots.
    fn restore_a(&mut self) {
        if self.selected.0.is_empty() {
            return;
        }
        let names: Vec<&str> = self.selected.0.iter().map(String::as_str).collect();
        if self.db_a.set_query_values(&names).is_err() {
            warn!(db = %self.label, "could not restore previous selection");
            self.routes = None;
        }
    }

    fn side_of(&self, name: &str) -> Option<Side> {
        let has = |list: &[String]| list.iter().any(|n| n.eq_ignore_ascii_case(name));
        if has(&self.names_a) {
            Some(Side::A)
        } else if has(&self.names_b) {
            Some(Side::B)
        } else {
            None
        }
    }
}

impl SpatialDb for CompositeDb {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&mut self) -> Result<()> {
        self.db_a.open()?;
        if let Err(e) = self.db_b.open() {
            self.db_a.close();
            return Err(e);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.db_a.close();
        self.db_b.close();
    }

    fn set_query_values(&mut self, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            return Err(Error::EmptyValueSelection);
        }

        let mut from_a: Vec<&str> = Vec::new();
        let mut from_b: Vec<&str> = Vec::new();
        let mut routes = Vec::with_capacity(names.len());

        for &name in names {
            let side = self.side_of(name).ok_or_else(|| Error::ValueNotFound {
                name: name.to_string(),
                available: self.names_a.iter().chain(&self.names_b).cloned().collect(),
            })?;
            let list = match side {
                Side::A => &mut from_a,
                Side::B => &mut from_b,
            };
            routes.push(Route {
                side,
                slot: list.len(),
            });
            list.push(name);
        }

        if !from_a.is_empty() {
            self.db_a.set_query_values(&from_a)?;
        }
        if !from_b.is_empty() {
            if let Err(e) = self.db_b.set_query_values(&from_b) {
                self.restore_a();
                return Err(e);
            }
        }

        let owned = |list: Vec<&str>| -> Vec<String> {
            list.into_iter().map(str::to_string).collect()
        };
        self.selected = (owned(from_a), owned(from_b));
        self.routes = Some(routes);
        Ok(())
    }

    fn query_value_count(&self) -> Option<usize> {
        self.routes.as_ref().map(Vec::len)
    }

    fn query(&self, values: &mut [f64], point: [f64; 3], coord_sys: &CoordSys) -> Result<()> {
        let routes = self.routes.as_ref().ok_or(Error::QueryValuesNotSet)?;
        if values.len() != routes.len() {
            return Err(Error::SizeMismatch {
                expected: routes.len(),
                actual: values.len(),
            });
        }

        let count = |side| routes.iter().filter(|r| r.side == side).count();
        let mut buf_a = vec![0.0; count(Side::A)];
        let mut buf_b = vec![0.0; count(Side::B)];
        if !buf_a.is_empty() {
            self.db_a.query(&mut buf_a, point, coord_sys)?;
        }
        if !buf_b.is_empty() {
            self.db_b.query(&mut buf_b, point, coord_sys)?;
        }

        for (out, route) in values.iter_mut().zip(routes) {
            *out = match route.side {
                Side::A => buf_a[route.slot],
                Side::B => buf_b[route.slot],
            };
        }
        Ok(())
    }
}
