use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::config::Config;
use crate::pipeline::TranscriptSource;
use crate::{Segment, Transcript};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    /// "asr" for auto-generated tracks
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Pick the first manual track in `languages` priority order, else the
/// auto-generated track in `fallback`.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String], fallback: &str) -> Option<&'a CaptionTrack> {
    languages
        .iter()
        .find_map(|lang| {
            tracks
                .iter()
                .find(|t| !t.is_generated() && t.language_code == *lang)
        })
        .or_else(|| {
            tracks
                .iter()
                .find(|t| t.is_generated() && t.language_code == fallback)
        })
}

/// Caption fetcher backed by YouTube's InnerTube player API
pub struct Captions {
    client: reqwest::Client,
    languages: Vec<String>,
    fallback_language: String,
    timeout: Duration,
}

impl Captions {
    pub fn new(client: reqwest::Client, languages: Vec<String>, fallback_language: String, timeout: Duration) -> Self {
        Self {
            client,
            languages,
            fallback_language,
            timeout,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.languages(),
            config.fallback_language(),
            config.request_timeout(),
        )
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    async fn fetch_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");
        let page_html = self.get_text(&watch_url).await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");
        let hl = self.languages.first().map(String::as_str).unwrap_or("en");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": hl,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| e.without_url())?
            .error_for_status()
            .map_err(|e| e.without_url())?
            .json()
            .await?;

        if let Some(status) = resp
            .playability_status
            .as_ref()
            .filter(|p| p.status.as_deref().is_some_and(|s| s != "OK"))
        {
            debug!(
                "Video {video_id} not playable: {} {}",
                status.status.as_deref().unwrap_or_default(),
                status.reason.as_deref().unwrap_or_default()
            );
        }

        Ok(resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default())
    }
}

#[async_trait]
impl TranscriptSource for Captions {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        let tracks = self.fetch_tracks(video_id).await?;
        if tracks.is_empty() {
            bail!("no captions available for video {video_id}");
        }

        let Some(track) = select_track(&tracks, &self.languages, &self.fallback_language) else {
            let available = tracks
                .iter()
                .map(|t| t.language_code.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!("no caption track in {:?} for video {video_id} (available: {available})", self.languages);
        };
        debug!(
            "Using caption track: lang={} generated={}",
            track.language_code,
            track.is_generated()
        );

        // Step 3: Fetch the caption XML
        let caption_xml = self.get_text(&track.base_url).await?;
        let segments = parse_caption_xml(&caption_xml)?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            language: track.language_code.clone(),
            generated: track.is_generated(),
            segments,
        })
    }
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    bail!("could not extract InnerTube API key from watch page");
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok(),
                        b"dur" => dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok(),
                        _ => {}
                    }
                }
                // Some tracks omit dur on the last fragment
                current = start.map(|s| (s, dur.unwrap_or(0.0)));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = current.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).replace('\n', " ");
                    let text = text.trim();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text: text.to_string(),
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => current = None,
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
