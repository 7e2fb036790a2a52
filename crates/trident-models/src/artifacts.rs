//! Sample artifacts shipped in the data directory.

use crate::error::ModelError;
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "aac", "flac"];

/// Face images under `<data_dir>/images`.
pub fn list_images(data_dir: &Path) -> Result<Vec<PathBuf>, ModelError> {
    list_with_extensions(&data_dir.join("images"), IMAGE_EXTENSIONS)
}

/// Voice recordings under `<data_dir>/audio`.
pub fn list_audio(data_dir: &Path) -> Result<Vec<PathBuf>, ModelError> {
    list_with_extensions(&data_dir.join("audio"), AUDIO_EXTENSIONS)
}

/// Regular files directly inside `dir` whose extension is in `extensions`
/// (case-insensitive), sorted. A missing directory yields an empty list.
fn list_with_extensions(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ModelError> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "artifact directory not found");
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| ModelError::io(dir, e))? {
        let path = entry.map_err(|e| ModelError::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if extensions.contains(&ext.as_str()) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
