use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::AdminError;

/// Resolve the directory holding the docadmin token slot.
///
/// Priority:
/// 1. the configured directory (`--data-dir` / `DOCADMIN_DATA_DIR`)
/// 2. Platform-specific app data dir (`~/.local/share/docadmin/`, etc.)
pub fn data_dir(configured: Option<&PathBuf>) -> Result<PathBuf, AdminError> {
    let path = match configured {
        Some(d) => d.clone(),
        None => ProjectDirs::from("", "", "docadmin")
            .ok_or_else(|| {
                AdminError::Configuration("could not determine platform data directory".into())
            })?
            .data_dir()
            .to_owned(),
    };

    std::fs::create_dir_all(&path).map_err(|e| {
        AdminError::Configuration(format!("create data dir {}: {e}", path.display()))
    })?;
    Ok(path)
}
