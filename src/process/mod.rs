// src/process/mod.rs
pub mod date_parser;
pub mod frame;
pub mod loader;
pub mod sanitize;
pub mod schema;
pub mod table;
pub mod utils;

use std::path::Path;
use tracing::info;

use crate::config::SanitizeConfig;
use crate::error::Result;

pub use frame::frame_data;
pub use loader::load_formatted_data;
pub use sanitize::sanitize_data;
pub use schema::Field;
pub use table::{Series, Table, Value};

/// Load, sanitize and frame the registry CSV at `path`.
///
/// Stages run strictly in order; any schema or read error aborts the run.
/// Re-running on the output is not supported since columns are renamed and
/// dropped along the way.
#[tracing::instrument(level = "info", skip(path, cfg), fields(path = %path.as_ref().display()))]
pub fn load_clean_data<P: AsRef<Path>>(path: P, cfg: &SanitizeConfig) -> Result<Table> {
    let table = load_formatted_data(path)?;
    let table = sanitize_data(table, cfg);
    let table = frame_data(table)?;
    info!(rows = table.num_rows(), columns = table.num_columns(), "clean table ready");
    Ok(table)
}
