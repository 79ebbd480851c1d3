use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::application::AppError;

/// Largest receipt image accepted: 2 MiB.
pub const MAX_RECEIPT_BYTES: u64 = 2 * 1024 * 1024;

/// An image ready to embed in an expense, held as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    data_uri: String,
}

impl ReceiptImage {
    /// Read an image file and encode it. The size limit is checked against
    /// file metadata before any content is read.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let mime = mime_for_path(path).ok_or_else(|| {
            AppError::validation(format!("Not a supported image file: {}", path.display()))
        })?;

        let metadata = tokio::fs::metadata(path).await?;
        check_size(metadata.len())?;

        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read receipt image");
        Self::from_bytes(&bytes, mime)
    }

    /// Encode raw image bytes with the given MIME type.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, AppError> {
        check_size(bytes.len() as u64)?;
        Ok(Self {
            data_uri: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        })
    }

    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}

fn check_size(len: u64) -> Result<(), AppError> {
    if len > MAX_RECEIPT_BYTES {
        return Err(AppError::validation(
            "Receipt too large: please select an image smaller than 2MB",
        ));
    }
    Ok(())
}

/// MIME type for a receipt file, from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
