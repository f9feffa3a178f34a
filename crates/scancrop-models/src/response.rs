//! Response bodies returned by the image service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::image::ImageRef;
use crate::region::Region;

/// Body of `POST /upload`: one new reference per uploaded file, in upload order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    pub uuids: Vec<ImageRef>,
}

/// Body of `GET /image/{ref}/regions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegionsResponse {
    pub regions: Vec<Region>,
}

/// Body of `GET /image/{ref}/cropped`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CroppedImagesResponse {
    /// Backend-relative file names, e.g. `"{ref}/cropped_0.jpg"`
    pub images: Vec<String>,
}

impl CroppedImagesResponse {
    /// Cropped indices encoded in the file names.
    ///
    /// Names that do not follow the `cropped_{index}.{ext}` pattern are skipped.
    pub fn indices(&self) -> Vec<usize> {
        self.images
            .iter()
            .filter_map(|name| {
                let file = name.rsplit('/').next()?;
                let stem = file.split('.').next()?;
                stem.strip_prefix("cropped_")?.parse().ok()
            })
            .collect()
    }
}

/// Acknowledgement body for crop, rotate and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// A decoded response body.
///
/// `Ok` holds the body when it matches the expected contract. Anything else
/// the backend sent (typically `{"detail": "..."}` alongside a 4xx) lands in
/// `Rejected` untouched, so the caller can decide what it means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Reply<T> {
    Ok(T),
    Rejected(Value),
}

impl<T> Reply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Reply::Ok(value) => Some(value),
            Reply::Rejected(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Value> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Rejected(body) => Err(body),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Ok(value) => Reply::Ok(f(value)),
            Reply::Rejected(body) => Reply::Rejected(body),
        }
    }

    /// The `detail` field of a rejected body, if any.
    ///
    /// String details are returned as-is; structured ones (validation error
    /// lists) are rendered as JSON text.
    pub fn detail(&self) -> Option<String> {
        match self {
            Reply::Ok(_) => None,
            Reply::Rejected(body) => match body.get("detail")? {
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }
}
