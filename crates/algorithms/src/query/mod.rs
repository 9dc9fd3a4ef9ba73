//! Query engine: value selection, mode dispatch and result assembly

mod engine;

pub use engine::{resolve_value_names, QueryEngine, QueryMode, QueryState};
