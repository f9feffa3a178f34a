//! Image identifiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned handle for an uploaded image.
///
/// The value is opaque: it is never parsed or validated on this side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which rendition of an image to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    /// The uploaded original.
    Original,
    /// One cropped derivative, by position in the cropped list.
    Cropped { index: usize },
}

impl ImageVariant {
    /// Path segment(s) below `/image/{ref}/`.
    pub fn path(&self) -> String {
        match self {
            ImageVariant::Original => "original".to_string(),
            ImageVariant::Cropped { index } => format!("cropped/{}", index),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageVariant::Original => "original",
            ImageVariant::Cropped { .. } => "cropped",
        }
    }
}

impl From<Option<usize>> for ImageVariant {
    /// `None` selects the original, `Some(i)` the i-th cropped image.
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(index) => ImageVariant::Cropped { index },
            None => ImageVariant::Original,
        }
    }
}
