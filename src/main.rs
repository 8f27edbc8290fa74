use anyhow::{Context, Result};
use daescraper::{config::Config, export, fetch, process};
use reqwest::blocking::Client;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG_FILE: &str = "daescraper.yaml";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,daescraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config_path = env::var("DAE_CONFIG")
        .map(PathBuf::from)
        .ok()
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));
    let config = Config::load(config_path.as_deref()).context("loading configuration")?;

    // ─── 3) fetch or reuse the cached registry ───────────────────────
    let client = Client::new();
    let start = Instant::now();
    let csv_path = fetch::fetch_or_cache(
        &client,
        &config.source_url,
        &config.data_dir,
        config.force_download,
    )
    .context("fetching registry CSV")?;
    info!(path = %csv_path.display(), elapsed = ?start.elapsed(), "registry available");

    // ─── 4) load → sanitize → frame ──────────────────────────────────
    let table = process::load_clean_data(&csv_path, &config.sanitize)
        .with_context(|| format!("cleaning {}", csv_path.display()))?;

    // ─── 5) export ───────────────────────────────────────────────────
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let stem = output_stem(&csv_path);
    let csv_out = config.output_dir.join(format!("{}_clean.csv", stem));
    let parquet_out = config.output_dir.join(format!("{}_clean.parquet", stem));

    export::write_csv(&table, &csv_out).context("writing clean CSV")?;
    let bytes = export::write_parquet(&table, &parquet_out).context("writing clean parquet")?;
    info!(
        rows = table.num_rows(),
        csv = %csv_out.display(),
        parquet = %parquet_out.display(),
        parquet_bytes = bytes,
        "all done"
    );
    Ok(())
}

fn output_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "dae".to_string())
}
