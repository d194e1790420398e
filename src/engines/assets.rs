//! Model and tessdata files cached on local disk

use crate::config::EngineConfig;
use crate::error::CaptureError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Make sure `filename` exists in `dir`, downloading it from `url` if allowed.
///
/// Offline configurations never touch the network; a missing file then
/// means the engine is unavailable.
pub fn ensure_cached(
    config: &EngineConfig,
    dir: &Path,
    filename: &str,
    url: &str,
) -> Result<PathBuf, CaptureError> {
    let path = dir.join(filename);
    if path.exists() {
        tracing::info!("Using cached {} from {:?}", filename, dir);
        return Ok(path);
    }

    if config.offline {
        return Err(CaptureError::EngineUnavailable(format!(
            "{} not found in {:?} and downloads are disabled",
            filename, dir
        )));
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        CaptureError::EngineUnavailable(format!("Failed to create {:?}: {}", dir, e))
    })?;

    tracing::info!("Downloading {} (this may take a moment)...", filename);
    download_file(url, &path)?;
    tracing::info!("Downloaded {} to {:?}", filename, path);

    Ok(path)
}

/// Stream `url` into `path`, via a partial file so an interrupted download
/// is never mistaken for a cached one
fn download_file(url: &str, path: &Path) -> Result<(), CaptureError> {
    let response = ureq::get(url).call().map_err(|e| {
        CaptureError::EngineUnavailable(format!("Failed to download {}: {}", url, e))
    })?;

    let partial = path.with_extension("part");
    let file = File::create(&partial).map_err(|e| {
        CaptureError::EngineUnavailable(format!("Failed to create {:?}: {}", partial, e))
    })?;

    let mut reader = response.into_body().into_reader();
    let mut writer = BufWriter::new(file);
    std::io::copy(&mut reader, &mut writer).map_err(|e| {
        CaptureError::EngineUnavailable(format!("Failed to write {:?}: {}", partial, e))
    })?;
    drop(writer);

    std::fs::rename(&partial, path).map_err(|e| {
        CaptureError::EngineUnavailable(format!("Failed to move {:?} into place: {}", path, e))
    })
}
