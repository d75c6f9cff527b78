use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use log::debug;
use serde::Deserialize;

use crate::VideoMetadata;
use crate::config::{self, YOUTUBE_API_KEY_VAR};
use crate::pipeline::MetadataSource;

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<ThumbnailRef>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailRef {
    url: String,
}

/// YouTube Data API v3 client for video snippets
pub struct DataApi {
    client: reqwest::Client,
    endpoint: String,
    api_key_var: String,
    timeout: Duration,
}

impl DataApi {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: VIDEOS_ENDPOINT.to_string(),
            api_key_var: YOUTUBE_API_KEY_VAR.to_string(),
            timeout,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Read the API key from `var` instead of `YOUTUBE_API_KEY`
    pub fn with_api_key_var(mut self, var: impl Into<String>) -> Self {
        self.api_key_var = var.into();
        self
    }

    async fn fetch_snippet(&self, video_id: &str, api_key: &str) -> Result<Option<VideoMetadata>> {
        debug!("Fetching video snippet for {video_id}");

        // The query string carries the API key; keep it out of error messages
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("part", "snippet"), ("id", video_id), ("key", api_key)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| e.without_url())?
            .error_for_status()
            .map_err(|e| e.without_url())?
            .text()
            .await
            .map_err(|e| e.without_url())?;

        parse_video_list(video_id, &body)
    }
}

#[async_trait]
impl MetadataSource for DataApi {
    async fn fetch(&self, video_id: &str) -> Result<Option<VideoMetadata>> {
        let api_key = config::api_key(&self.api_key_var)?;
        self.fetch_snippet(video_id, &api_key).await
    }
}

fn parse_video_list(video_id: &str, body: &str) -> Result<Option<VideoMetadata>> {
    let resp: VideoListResponse = serde_json::from_str(body)?;
    let Some(item) = resp.items.into_iter().next() else {
        debug!("No items returned for {video_id}");
        return Ok(None);
    };

    Ok(Some(VideoMetadata {
        video_id: video_id.to_string(),
        title: item.snippet.title,
        thumbnail_url: item.snippet.thumbnails.high.map(|t| t.url),
    }))
}
