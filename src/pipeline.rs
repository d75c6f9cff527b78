use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use log::{error, info, warn};

use crate::config::Config;
use crate::metadata::DataApi;
use crate::summarize::ChatCompletions;
use crate::thumbnail::Thumbnail;
use crate::youtube::Captions;
use crate::{Report, Transcript, VideoMetadata};

/// Looks up title and thumbnail URL for a video. `Ok(None)` means no such video.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Option<VideoMetadata>>;
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Thumbnail>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

/// Pipeline step currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metadata,
    Transcript,
    Summary,
}

impl Stage {
    pub fn status_text(&self) -> &'static str {
        match self {
            Stage::Metadata => "Fetching video info...",
            Stage::Transcript => "Fetching transcript...",
            Stage::Summary => "Generating summary...",
        }
    }
}

/// Intermediate results reported while the pipeline runs
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Stage(Stage),
    Metadata(VideoMetadata),
    Thumbnail(Thumbnail),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Couldn't fetch video details. Check:\n1. Video ID\n2. YouTube API key")]
    VideoDetails,
    #[error("No English transcript available for this video")]
    Transcript,
    #[error("Summary failed: {0}")]
    Summary(String),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::VideoDetails => Stage::Metadata,
            PipelineError::Transcript => Stage::Transcript,
            PipelineError::Summary(_) => Stage::Summary,
        }
    }
}

/// Metadata, then thumbnail, then transcript, then summary; stops at the first failure
pub struct Pipeline {
    metadata: Arc<dyn MetadataSource>,
    transcripts: Arc<dyn TranscriptSource>,
    summarizer: Arc<dyn Summarizer>,
    thumbnails: Option<Arc<dyn ThumbnailSource>>,
}

impl Pipeline {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        transcripts: Arc<dyn TranscriptSource>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            metadata,
            transcripts,
            summarizer,
            thumbnails: None,
        }
    }

    pub fn with_thumbnails(mut self, thumbnails: Arc<dyn ThumbnailSource>) -> Self {
        self.thumbnails = Some(thumbnails);
        self
    }

    /// Build the production pipeline from config, sharing one HTTP client
    pub fn from_config(client: &reqwest::Client, config: &Config) -> Self {
        Self::new(
            Arc::new(DataApi::new(client.clone(), config.request_timeout())),
            Arc::new(Captions::from_config(client.clone(), config)),
            Arc::new(ChatCompletions::from_config(client.clone(), config)),
        )
    }

    pub async fn run<F>(&self, video_id: &str, mut progress: F) -> Result<Report, PipelineError>
    where
        F: FnMut(Progress),
    {
        progress(Progress::Stage(Stage::Metadata));
        let metadata = match self.metadata.fetch(video_id).await {
            Ok(Some(metadata)) if !metadata.title.trim().is_empty() => metadata,
            Ok(Some(_)) => {
                warn!("Video {video_id} has no title");
                return Err(PipelineError::VideoDetails);
            }
            Ok(None) => {
                warn!("No video found for id {video_id}");
                return Err(PipelineError::VideoDetails);
            }
            Err(e) => {
                error!("Error fetching video details: {e:#}");
                return Err(PipelineError::VideoDetails);
            }
        };
        info!("Video: {} ({video_id})", metadata.title);
        progress(Progress::Metadata(metadata.clone()));

        if let (Some(thumbnails), Some(url)) = (&self.thumbnails, &metadata.thumbnail_url) {
            match thumbnails.fetch(url).await {
                Ok(thumbnail) => progress(Progress::Thumbnail(thumbnail)),
                Err(e) => warn!("Couldn't load thumbnail: {e:#}"),
            }
        }

        progress(Progress::Stage(Stage::Transcript));
        let transcript = match self.transcripts.fetch(video_id).await {
            Ok(transcript) if !transcript.is_empty() => transcript,
            Ok(_) => {
                warn!("Transcript for {video_id} has no segments");
                return Err(PipelineError::Transcript);
            }
            Err(e) => {
                error!("Error fetching transcript: {e:#}");
                return Err(PipelineError::Transcript);
            }
        };
        info!(
            "Transcript: {} segments, language={}, generated={}",
            transcript.segments.len(),
            transcript.language,
            transcript.generated
        );

        progress(Progress::Stage(Stage::Summary));
        let summary = match self.summarizer.summarize(&transcript.text()).await {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => {
                error!("Summarizer returned an empty response");
                return Err(PipelineError::Summary("empty response from model".to_string()));
            }
            Err(e) => {
                error!("Error generating summary: {e:#}");
                return Err(PipelineError::Summary(format!("{e:#}")));
            }
        };
        info!("Summary: {} chars", summary.chars().count());

        Ok(Report { metadata, summary })
    }
}
