// src/fetch/mod.rs

use anyhow::{anyhow, Context};
use reqwest::blocking::Client;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use url::Url;

use crate::error::{PipelineError, Result};

/// File name used to cache `url`: the last path segment, query string stripped.
pub fn cache_file_name(url_str: &str) -> Result<String> {
    let url = Url::parse(url_str).map_err(|e| fetch_error(url_str, e.into()))?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| fetch_error(url_str, anyhow!("URL has no file name")))
}

/// Return the local copy of `url` under `cache_dir`, downloading it when the
/// file is absent or `force` is set.
///
/// The body is decoded with the charset the server declares (UTF-8 when it
/// declares none) and written through a temporary file.
#[tracing::instrument(level = "info", skip(client, cache_dir), fields(dir = %cache_dir.as_ref().display()))]
pub fn fetch_or_cache(
    client: &Client,
    url: &str,
    cache_dir: impl AsRef<Path>,
    force: bool,
) -> Result<PathBuf> {
    let dest_path = cache_dir.as_ref().join(cache_file_name(url)?);
    if dest_path.exists() && !force {
        debug!(path = %dest_path.display(), "cache hit");
        return Ok(dest_path);
    }

    download(client, url, &dest_path).map_err(|e| fetch_error(url, e))?;
    info!(path = %dest_path.display(), "downloaded");
    Ok(dest_path)
}

fn download(client: &Client, url: &str, dest_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating cache directory {:?}", parent))?;
    }

    let body = client
        .get(url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .text_with_charset("utf-8")
        .with_context(|| format!("reading body from {}", url))?;

    let tmp_path = dest_path.with_extension("tmp");
    fs::write(&tmp_path, body.as_bytes())
        .with_context(|| format!("writing {:?}", tmp_path))?;
    fs::rename(&tmp_path, dest_path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, dest_path))?;
    Ok(())
}

fn fetch_error(url: &str, source: anyhow::Error) -> PipelineError {
    PipelineError::Fetch {
        url: url.to_string(),
        source: source.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn file_name_strips_query() -> Result<()> {
        assert_eq!(
            cache_file_name("https://data.example.org/files/MMM_MMM_DAE.csv?download=1")?,
            "MMM_MMM_DAE.csv"
        );
        assert!(matches!(
            cache_file_name("https://data.example.org/"),
            Err(PipelineError::Fetch { .. })
        ));
        assert!(cache_file_name("not a url").is_err());
        Ok(())
    }

    #[test]
    fn cached_file_is_reused_without_network() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let cached = dir.path().join("registry.csv");
        fs::write(&cached, "nom\nA\n")?;

        // unroutable host: a request would fail
        let url = "http://127.0.0.1:9/registry.csv?x=1";
        let path = fetch_or_cache(&Client::new(), url, dir.path(), false)?;
        assert_eq!(path, cached);
        assert_eq!(fs::read_to_string(&path)?, "nom\nA\n");
        Ok(())
    }

    #[test]
    fn forced_download_failure_is_fetch_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("registry.csv"), "stale")?;
        let err = fetch_or_cache(
            &Client::new(),
            "http://127.0.0.1:9/registry.csv",
            dir.path().join("nested"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Fetch { .. }));
        Ok(())
    }
}
