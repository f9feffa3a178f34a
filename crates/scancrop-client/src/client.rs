//! Image service HTTP client.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, Request, RequestBuilder, StatusCode};
use scancrop_models::{
    CroppedImagesResponse, ImageRef, ImageVariant, Region, RegionsResponse, Reply, StatusResponse,
    UploadResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, warn, Instrument};

use crate::cache_buster::CacheBuster;
use crate::config::{ImageApiConfig, StatusPolicy};
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_request, record_transport_failure};
use crate::upload::{build_form, ImageFile};

/// JSON body of `POST /image/{ref}/crop`.
#[derive(Debug, Serialize)]
struct CropRequest<'a> {
    regions: &'a [Region],
}

/// Client for the image-cropping service.
///
/// Every method issues exactly one request and returns once the response body
/// has been read. Nothing is cached or retried, and calls made concurrently
/// are not ordered relative to each other. Clones share the connection pool
/// and the cache-buster.
#[derive(Clone)]
pub struct ImageApiClient {
    http: Client,
    config: ImageApiConfig,
    cache_buster: Arc<CacheBuster>,
}

impl ImageApiClient {
    /// Create a new client.
    pub fn new(config: ImageApiConfig) -> ApiResult<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("scancrop-client/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http = builder.build().map_err(ApiError::Transport)?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client on top of an existing `reqwest::Client`.
    ///
    /// Timeouts in `config` are ignored here; they belong to the supplied client.
    pub fn with_http_client(config: ImageApiConfig, http: Client) -> Self {
        Self {
            http,
            config,
            cache_buster: Arc::new(CacheBuster::new()),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(ImageApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ImageApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// `{base}/image/{ref}` followed by `suffix` (which starts with `/` or is empty).
    fn image_path(&self, image: &ImageRef, suffix: &str) -> String {
        format!(
            "{}/image/{}{}",
            self.config.base_url,
            urlencoding::encode(image.as_str()),
            suffix
        )
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Check that the service is up (`GET /`).
    pub async fn health(&self) -> ApiResult<Reply<String>> {
        let request = self.http.get(self.url("/"));
        self.execute("health", None, request).await
    }

    /// Upload images as one multipart request, one `files` part per image.
    ///
    /// An empty input still sends the request; the service decides what an
    /// upload of nothing means.
    pub async fn upload_images(
        &self,
        files: impl IntoIterator<Item = ImageFile>,
    ) -> ApiResult<Reply<UploadResponse>> {
        let (form, count) = build_form(files)?;
        debug!(files = count, "Prepared upload form");

        let request = self.http.post(self.url("/upload")).multipart(form);
        self.execute("upload_images", None, request).await
    }

    /// List every image the service knows about.
    pub async fn get_images(&self) -> ApiResult<Reply<Vec<ImageRef>>> {
        let request = self.http.get(self.url("/images"));
        self.execute("get_images", None, request).await
    }

    /// Run region detection on an uploaded image.
    pub async fn get_regions(&self, image: &ImageRef) -> ApiResult<Reply<RegionsResponse>> {
        let request = self.http.get(self.image_path(image, "/regions"));
        self.execute("get_regions", Some(image), request).await
    }

    /// Crop the image into one derivative per region.
    ///
    /// Sends `{"regions": [...]}`; previously cropped derivatives are replaced
    /// by the service.
    pub async fn crop_regions(
        &self,
        image: &ImageRef,
        regions: &[Region],
    ) -> ApiResult<Reply<StatusResponse>> {
        let request = self
            .http
            .post(self.image_path(image, "/crop"))
            .json(&CropRequest { regions });
        self.execute("crop_regions", Some(image), request).await
    }

    /// List the cropped derivatives of an image.
    pub async fn get_cropped_images(
        &self,
        image: &ImageRef,
    ) -> ApiResult<Reply<CroppedImagesResponse>> {
        let request = self.http.get(self.image_path(image, "/cropped"));
        self.execute("get_cropped_images", Some(image), request).await
    }

    /// Rotate one cropped derivative by 90 degrees clockwise.
    pub async fn rotate_cropped_image(
        &self,
        image: &ImageRef,
        index: usize,
    ) -> ApiResult<Reply<StatusResponse>> {
        let request = self
            .http
            .post(self.image_path(image, &format!("/cropped/{}/rotate", index)));
        self.execute("rotate_cropped_image", Some(image), request)
            .await
    }

    /// Delete one cropped derivative. The index may refer to nothing afterwards.
    pub async fn delete_cropped_image(
        &self,
        image: &ImageRef,
        index: usize,
    ) -> ApiResult<Reply<StatusResponse>> {
        let request = self
            .http
            .delete(self.image_path(image, &format!("/cropped/{}", index)));
        self.execute("delete_cropped_image", Some(image), request)
            .await
    }

    /// Delete an image together with all of its derivatives.
    pub async fn delete_image(&self, image: &ImageRef) -> ApiResult<Reply<StatusResponse>> {
        let request = self.http.delete(self.image_path(image, ""));
        self.execute("delete_image", Some(image), request).await
    }

    /// URL of an image rendition with a fresh `random=` stamp.
    ///
    /// No request is made. Each call returns a distinct URL so that viewers
    /// pick up rotated or re-cropped bytes.
    pub fn image_url(&self, image: &ImageRef, variant: ImageVariant) -> String {
        format!(
            "{}?random={}",
            self.image_path(image, &format!("/{}", variant.path())),
            self.cache_buster.next()
        )
    }

    pub fn original_url(&self, image: &ImageRef) -> String {
        self.image_url(image, ImageVariant::Original)
    }

    pub fn cropped_url(&self, image: &ImageRef, index: usize) -> String {
        self.image_url(image, ImageVariant::Cropped { index })
    }

    /// Download the raw bytes of an image rendition.
    ///
    /// Unlike the JSON operations this always fails on a non-success status,
    /// since an error body is not image data.
    pub async fn fetch_image(&self, image: &ImageRef, variant: ImageVariant) -> ApiResult<Vec<u8>> {
        let span = info_span!(
            "image_api",
            operation = "fetch_image",
            image = %image,
            variant = variant.as_str()
        );

        async {
            let request = self.http.get(self.image_url(image, variant)).build()?;
            let (status, body) = self.send("fetch_image", request).await?;

            if !status.is_success() {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }

            debug!(bytes = body.len(), "Fetched image");
            Ok(body)
        }
        .instrument(span)
        .await
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Send one request and decode the body into a reply.
    async fn execute<T>(
        &self,
        operation: &'static str,
        image: Option<&ImageRef>,
        request: RequestBuilder,
    ) -> ApiResult<Reply<T>>
    where
        T: DeserializeOwned,
    {
        let span = info_span!(
            "image_api",
            operation = operation,
            image = image.map(ImageRef::as_str).unwrap_or("-")
        );

        async {
            let request = request.build()?;
            let (status, body) = self.send(operation, request).await?;

            if !status.is_success() {
                warn!(
                    status = status.as_u16(),
                    body = %String::from_utf8_lossy(&body),
                    "Image service returned non-success status"
                );
                if self.config.status_policy == StatusPolicy::Strict {
                    return Err(ApiError::Status {
                        status: status.as_u16(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    });
                }
            }

            let reply: Reply<T> =
                serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
                    status: status.as_u16(),
                    source,
                })?;

            debug!(
                status = status.as_u16(),
                accepted = reply.is_ok(),
                "Decoded image service response"
            );
            Ok(reply)
        }
        .instrument(span)
        .await
    }

    /// Execute a built request and read the whole body.
    async fn send(
        &self,
        operation: &'static str,
        request: Request,
    ) -> ApiResult<(StatusCode, Vec<u8>)> {
        debug!(method = %request.method(), url = %request.url(), "Sending image API request");
        let started = Instant::now();

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let elapsed = started.elapsed().as_secs_f64() * 1000.0;
                record_transport_failure(operation, elapsed);
                warn!(error = %e, "Image API request failed");
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, "Failed to read image API response body");
            ApiError::Transport(e)
        })?;

        let elapsed = started.elapsed().as_secs_f64() * 1000.0;
        record_request(operation, status.as_u16(), elapsed);

        Ok((status, body.to_vec()))
    }
}
