//! Client for the scancrop image service.
//!
//! This crate provides a thin async client over the service's HTTP API:
//! upload, listing, region detection, cropping, rotation and deletion, plus
//! cache-busted URLs for displaying originals and crops.
//!
//! Responses come back as [`Reply`] values. With the default
//! [`StatusPolicy::PassThrough`] a 4xx/5xx body is decoded and returned like
//! any other, so callers must check for `Reply::Rejected`.

pub mod cache_buster;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod upload;


pub use client::ImageApiClient;
pub use config::{ImageApiConfig, StatusPolicy, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use upload::ImageFile;

pub use scancrop_models::{
    CroppedImagesResponse, ImageRef, ImageVariant, Point, Region, RegionsResponse, Reply,
    StatusResponse, UploadResponse,
};
