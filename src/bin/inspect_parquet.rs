use anyhow::{Context, Result};
use arrow::array::Array;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::{collections::BTreeMap, env, fs::File, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: path to a clean DAE Parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <PARQUET_FILE>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_parquet(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print file metadata, the Arrow schema and the fill rate of every column.
fn inspect_parquet(path: &Path) -> Result<()> {
    let reader = SerializedFileReader::new(
        File::open(path).with_context(|| format!("opening {}", path.display()))?,
    )?;
    let file_meta = reader.metadata().file_metadata();

    println!("=== Parquet File: {} ===", path.display());
    println!(
        "Created by:           {}",
        file_meta.created_by().unwrap_or("<unknown>")
    );
    println!("Total rows:           {}", file_meta.num_rows());
    println!("Number of row groups: {}", reader.metadata().num_row_groups());
    println!("File-size on disk:    {} bytes", std::fs::metadata(path)?.len());
    println!();

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    let schema = builder.schema().clone();

    // column index -> (present, null)
    let mut fill: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for batch in builder.build()? {
        let batch = batch?;
        for (idx, col) in batch.columns().iter().enumerate() {
            let entry = fill.entry(idx).or_default();
            entry.0 += col.len() - col.null_count();
            entry.1 += col.null_count();
        }
    }

    println!("=== Columns ===");
    for (idx, field) in schema.fields().iter().enumerate() {
        let (present, nulls) = fill.get(&idx).copied().unwrap_or_default();
        let total = present + nulls;
        let rate = if total == 0 {
            0.0
        } else {
            present as f64 * 100.0 / total as f64
        };
        println!(
            "- {:<35} | {:<8} | filled {:>6} / {:<6} ({:5.1}%)",
            field.name(),
            format!("{}", field.data_type()),
            present,
            total,
            rate
        );
    }
    Ok(())
}
