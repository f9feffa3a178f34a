//! CLI argument definitions and command dispatch.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use scancrop_client::{ImageApiClient, ImageFile, ImageRef, ImageVariant, Region, Reply};

#[derive(Parser, Debug)]
#[command(name = "scancrop")]
#[command(about = "Upload, detect, crop and manage scanned images")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Image service base URL (overrides IMAGE_API_BASE)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Treat non-success HTTP statuses as errors
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the service is reachable
    Health,
    /// Upload one or more images
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List uploaded images
    List,
    /// Detect regions in an image
    Regions { image: String },
    /// Crop an image into regions
    Crop {
        image: String,
        /// JSON file with the regions to crop; detected regions are used if omitted
        #[arg(long)]
        regions: Option<PathBuf>,
    },
    /// List the cropped images of an image
    Cropped { image: String },
    /// Rotate a cropped image 90 degrees clockwise
    Rotate { image: String, index: usize },
    /// Delete one cropped image
    DeleteCropped { image: String, index: usize },
    /// Delete an image and all its crops
    Delete { image: String },
    /// Print a cache-busted URL for an image
    Url {
        image: String,
        /// Address this cropped image instead of the original
        #[arg(long)]
        cropped: Option<usize>,
    },
    /// Download an image to a file
    Download {
        image: String,
        /// Download this cropped image instead of the original
        #[arg(long)]
        cropped: Option<usize>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Whether the service accepted the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl Commands {
    pub async fn run(self, client: &ImageApiClient) -> anyhow::Result<Outcome> {
        match self {
            Commands::Health => print_reply(&client.health().await?),
            Commands::Upload { files } => {
                let mut payloads = Vec::with_capacity(files.len());
                for file in &files {
                    let payload = ImageFile::from_path(file)
                        .await
                        .with_context(|| format!("Failed to read {}", file.display()))?;
                    payloads.push(payload);
                }
                info!(count = payloads.len(), "Uploading images");
                print_reply(&client.upload_images(payloads).await?)
            }
            Commands::List => print_reply(&client.get_images().await?),
            Commands::Regions { image } => {
                print_reply(&client.get_regions(&ImageRef::from(image)).await?)
            }
            Commands::Crop { image, regions } => {
                let image = ImageRef::from(image);
                let regions = match regions {
                    Some(path) => load_regions(&path).await?,
                    None => match client.get_regions(&image).await? {
                        Reply::Ok(detected) => detected.regions,
                        rejected => return print_reply(&rejected),
                    },
                };
                info!(image = %image, regions = regions.len(), "Cropping image");
                print_reply(&client.crop_regions(&image, &regions).await?)
            }
            Commands::Cropped { image } => {
                print_reply(&client.get_cropped_images(&ImageRef::from(image)).await?)
            }
            Commands::Rotate { image, index } => print_reply(
                &client
                    .rotate_cropped_image(&ImageRef::from(image), index)
                    .await?,
            ),
            Commands::DeleteCropped { image, index } => print_reply(
                &client
                    .delete_cropped_image(&ImageRef::from(image), index)
                    .await?,
            ),
            Commands::Delete { image } => {
                print_reply(&client.delete_image(&ImageRef::from(image)).await?)
            }
            Commands::Url { image, cropped } => {
                println!(
                    "{}",
                    client.image_url(&ImageRef::from(image), ImageVariant::from(cropped))
                );
                Ok(Outcome::Accepted)
            }
            Commands::Download {
                image,
                cropped,
                output,
            } => {
                let bytes = client
                    .fetch_image(&ImageRef::from(image), ImageVariant::from(cropped))
                    .await?;
                tokio::fs::write(&output, &bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                info!(bytes = bytes.len(), path = %output.display(), "Saved image");
                Ok(Outcome::Accepted)
            }
        }
    }
}

/// Read regions from a JSON file.
///
/// Accepts either a bare region list or a `{"regions": [...]}` object, so the
/// output of `scancrop regions` can be edited and fed back in.
pub async fn load_regions(path: &Path) -> anyhow::Result<Vec<Region>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RegionsFile {
        Wrapped { regions: Vec<Region> },
        Bare(Vec<Region>),
    }

    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: RegionsFile = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a region list", path.display()))?;

    Ok(match parsed {
        RegionsFile::Wrapped { regions } | RegionsFile::Bare(regions) => regions,
    })
}

fn print_reply<T: Serialize>(reply: &Reply<T>) -> anyhow::Result<Outcome> {
    println!("{}", serde_json::to_string_pretty(reply)?);

    if let Some(detail) = reply.detail() {
        warn!(detail = %detail, "Image service rejected the request");
    }

    Ok(if reply.is_ok() {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    })
}
