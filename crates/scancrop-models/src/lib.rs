//! Shared data contracts for the scancrop image service.
//!
//! This crate provides Serde-serializable types for:
//! - Image references and image variants (original / cropped)
//! - Regions as lists of `[x, y]` points
//! - Response bodies returned by the service
//! - The pass-through reply envelope

pub mod image;
pub mod region;
pub mod response;

// Re-export common types
pub use image::{ImageRef, ImageVariant};
pub use region::{Point, Region};
pub use response::{
    CroppedImagesResponse, RegionsResponse, Reply, StatusResponse, UploadResponse,
};
