use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs, fs::File, path::Path};
use tracing::debug;

use super::arrow::to_record_batch;
use crate::error::Result;
use crate::process::Table;

/// Write `table` as a single-row-group Parquet file.
///
/// Written to `<path>.tmp` first, then renamed over `path`.
pub fn write_parquet(table: &Table, path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let batch = to_record_batch(table)?;
    let tmp_path = path.with_extension("parquet.tmp");

    let file = File::create(&tmp_path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_dictionary_enabled(true)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    fs::rename(&tmp_path, path)?;
    let bytes = fs::metadata(path)?.len();
    debug!(path = %path.display(), rows = batch.num_rows(), bytes, "wrote parquet");
    Ok(bytes)
}
