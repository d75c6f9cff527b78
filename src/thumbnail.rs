use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use image::imageops::FilterType;
use log::debug;

use crate::pipeline::ThumbnailSource;

pub const THUMBNAIL_WIDTH: u32 = 320;
pub const THUMBNAIL_HEIGHT: u32 = 180;

/// Decoded thumbnail as RGBA8 pixels
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Decode any supported image and resize it to the fixed display box
pub fn decode(bytes: &[u8]) -> Result<Thumbnail> {
    let img = image::load_from_memory(bytes)?;
    let resized = img
        .resize_exact(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, FilterType::Lanczos3)
        .to_rgba8();
    Ok(Thumbnail {
        width: resized.width(),
        height: resized.height(),
        rgba: resized.into_raw(),
    })
}

pub struct HttpThumbnails {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpThumbnails {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl ThumbnailSource for HttpThumbnails {
    async fn fetch(&self, url: &str) -> Result<Thumbnail> {
        debug!("Fetching thumbnail: {url}");
        let bytes = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        decode(&bytes)
    }
}
