pub mod arrow;
pub mod parquet;

use std::{fs, path::Path};
use tracing::debug;

use crate::error::Result;
use crate::process::Table;

pub use self::arrow::{arrow_schema, to_record_batch};
pub use self::parquet::write_parquet;

/// Write `table` as CSV with display-name headers; missing cells are empty.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("csv.tmp");
    {
        let mut wtr = csv::Writer::from_path(&tmp_path)?;
        wtr.write_record(table.columns().iter().map(|s| s.field.display_name()))?;
        for i in 0..table.num_rows() {
            wtr.write_record(table.row(i).iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    debug!(path = %path.display(), rows = table.num_rows(), "wrote csv");
    Ok(())
}
