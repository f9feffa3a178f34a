//! Upload payloads.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::{ApiError, ApiResult};

/// Multipart field name the service expects for each file.
pub const FILES_FIELD: &str = "files";

/// One file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, inferring the content type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }

    fn into_part(self) -> ApiResult<Part> {
        let name = self.file_name.clone();
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|e| ApiError::InvalidFile {
                name,
                reason: e.to_string(),
            })
    }
}

/// Content type for a path, by extension.
///
/// The service rejects parts whose type is not `image/*`, so unknown
/// extensions fall back to `application/octet-stream` and fail server-side.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Build the multipart form with one `files` part per file. An empty
/// iterator yields an empty form.
pub(crate) fn build_form(files: impl IntoIterator<Item = ImageFile>) -> ApiResult<(Form, usize)> {
    let mut form = Form::new();
    let mut count = 0;
    for file in files {
        form = form.part(FILES_FIELD, file.into_part()?);
        count += 1;
    }
    Ok((form, count))
}
