pub mod app;
pub mod config;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod summarize;
pub mod thumbnail;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Title and thumbnail for a single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Caption transcript for a video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    /// True when the track was auto-generated (ASR) rather than authored
    pub generated: bool,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// All segment texts joined by single spaces, in caption order
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Result of a complete summarization run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub metadata: VideoMetadata,
    pub summary: String,
}

static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^([a-zA-Z0-9_-]{11})$",
        r"youtube\.com/watch\?.*v=([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static video id pattern"))
    .collect()
});

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}

/// Turn user input into the identifier sent to the APIs.
///
/// Recognized YouTube URLs are reduced to their video id; anything else that
/// is non-empty is passed through as-is.
pub fn normalize_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(extract_video_id(input).unwrap_or_else(|| input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_unrecognized_input() {
        assert_eq!(extract_video_id("not-a-valid-id"), None);
    }

    #[test]
    fn test_normalize_passes_opaque_ids_through() {
        assert_eq!(normalize_input("  some-id  "), Some("some-id".to_string()));
        assert_eq!(
            normalize_input("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_normalize_rejects_blank_input() {
        assert_eq!(normalize_input(""), None);
        assert_eq!(normalize_input(" \t\n"), None);
    }

    #[test]
    fn test_transcript_text_joins_with_single_spaces() {
        let transcript = Transcript {
            video_id: "abc".to_string(),
            language: "en".to_string(),
            generated: false,
            segments: vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "this is a test".to_string(),
                    start: 1.5,
                    duration: 2.0,
                },
            ],
        };
        assert_eq!(transcript.text(), "Hello world this is a test");
    }
}
