//! Saving user-submitted images into the image folder.

use crate::{image_set, volatile_state::VolatileState};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Literal tag at the start of every uploaded file name
pub const UPLOAD_TAG: &str = "user_upload";

pub struct UploadRules {
    pub caption_max_chars: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("`{0}` is not a supported image")]
    NoValidAttachment(String),
    #[error("caption is {len} characters, limit is {max}")]
    CaptionTooLong { len: usize, max: usize },
    #[error("could not download attachment: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("could not write `{}`: {source}", .path.to_string_lossy())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Saved, but posting it back to the channel failed
    #[error("could not post `{}`: {source}", .path.to_string_lossy())]
    Repost {
        path: PathBuf,
        #[source]
        source: serenity::Error,
    },
}

impl UploadError {
    /// Short message shown to the person who sent the image
    pub fn user_message(&self) -> String {
        match self {
            UploadError::NoValidAttachment(_) => {
                "Please attach a png, jpg, jpeg or gif image.".to_owned()
            }
            UploadError::CaptionTooLong { max, .. } => {
                format!("Please keep the text to {} characters or fewer.", max)
            }
            UploadError::Fetch(_) => "Failed to download the image.".to_owned(),
            UploadError::Write { .. } => "An error occurred while saving the image.".to_owned(),
            UploadError::Repost { .. } => {
                "The image was saved, but posting it failed.".to_owned()
            }
        }
    }
}

/// Where uploaded image bytes come from
#[serenity::async_trait]
pub trait ImageSource: Sync {
    async fn fetch(&self) -> Result<Vec<u8>, UploadError>;
}

#[derive(Debug)]
pub struct Saved {
    pub file_name: String,
    pub path: PathBuf,
}

/// Replace everything outside `[a-zA-Z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn upload_file_name(epoch_ms: i64, original_name: &str) -> String {
    format!(
        "{}_{}_{}",
        UPLOAD_TAG,
        epoch_ms,
        sanitize_file_name(original_name)
    )
}

/// Reject an upload before anything is downloaded or written.
pub fn validate(original_name: &str, caption: &str, rules: &UploadRules) -> Result<(), UploadError> {
    if !image_set::is_accepted(original_name) {
        return Err(UploadError::NoValidAttachment(original_name.to_owned()));
    }

    let len = caption.chars().count();
    if len > rules.caption_max_chars {
        return Err(UploadError::CaptionTooLong {
            len,
            max: rules.caption_max_chars,
        });
    }

    Ok(())
}

/// Validate, fetch and store an uploaded image, then mark it as recently sent.
///
/// Nothing is written and the recency buffer is untouched unless every step succeeds.
pub async fn ingest(
    dir: &Path,
    vstate: &RwLock<VolatileState>,
    source: &dyn ImageSource,
    original_name: &str,
    caption: &str,
    rules: &UploadRules,
) -> Result<Saved, UploadError> {
    validate(original_name, caption, rules)?;

    let bytes = source.fetch().await?;

    let file_name = upload_file_name(chrono::Utc::now().timestamp_millis(), original_name);
    let path = dir.join(&file_name);
    write_whole(dir, &file_name, &bytes).await?;

    vstate.write().await.recent.push(file_name.clone());

    Ok(Saved { file_name, path })
}

/// Write via a hidden temporary file so a failed write never leaves a partial image behind.
async fn write_whole(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<(), UploadError> {
    let path = dir.join(file_name);
    // `.part` is not an accepted extension, so the picker never sees this file
    let tmp_path = dir.join(format!(".{}.part", file_name));

    let result = match tokio::fs::write(&tmp_path, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp_path, &path).await,
        Err(e) => Err(e),
    };

    if let Err(source) = result {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(UploadError::Write { path, source });
    }

    Ok(())
}
