//! The images the bot can send: every file in the image folder with an accepted extension.

use crate::config::ConfigError;
use std::{io, path::Path};

/// Compared case-insensitively
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

pub fn is_accepted(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Snapshot of the accepted image file names in `dir`, sorted.
///
/// The folder may change underneath us at any time; a file added mid-listing may or may not show
/// up.
pub async fn list(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            continue;
        }
        // Non-UTF-8 names could not be sent back to Discord by name anyway
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_accepted(&name) {
            names.push(name);
        }
    }

    names.sort_unstable();
    Ok(names)
}

/// Startup check that the image folder exists and is a directory.
pub async fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| ConfigError::ImageFolderInaccessible {
            path: path.to_path_buf(),
            source,
        })?;

    if !metadata.is_dir() {
        return Err(ConfigError::ImageFolderNotDirectory(path.to_path_buf()));
    }

    Ok(())
}
