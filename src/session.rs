//! Window state as a plain value.
//!
//! Every transition consumes the current [`Session`] and returns the next one,
//! so the iced layer only forwards messages and renders whatever it gets back.

use crate::pipeline::{PipelineError, Progress, Stage};
use crate::thumbnail::Thumbnail;
use crate::{Report, VideoMetadata, normalize_input};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Working(Stage),
    Done,
    Cancelled,
    Failed(Stage),
}

/// Color family used when rendering the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Progress,
    Success,
    Error,
}

impl Status {
    pub fn text(&self) -> &'static str {
        match self {
            Status::Idle => "",
            Status::Working(stage) => stage.status_text(),
            Status::Done => "Done!",
            Status::Cancelled => "Cancelled",
            Status::Failed(Stage::Metadata) => "Couldn't fetch video info",
            Status::Failed(Stage::Transcript) => "Couldn't fetch transcript",
            Status::Failed(Stage::Summary) => "Couldn't generate summary",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::Idle | Status::Cancelled => Tone::Neutral,
            Status::Working(_) => Tone::Progress,
            Status::Done => Tone::Success,
            Status::Failed(_) => Tone::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

/// Modal message; the main controls stay blocked until it is dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn new(kind: DialogKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub input: String,
    pub status: Status,
    pub metadata: Option<VideoMetadata>,
    pub thumbnail: Option<Thumbnail>,
    pub summary: Option<String>,
    pub dialog: Option<Dialog>,
}

impl Session {
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, Status::Working(_))
    }

    pub fn edit(self, input: String) -> Self {
        Self { input, ..self }
    }

    /// Validate the input and reset previous output.
    ///
    /// Returns the video id to run the pipeline for, or `None` when nothing
    /// should start (blank input or a job already running).
    pub fn submit(self) -> (Self, Option<String>) {
        if self.is_running() {
            return (self, None);
        }
        let Some(video_id) = normalize_input(&self.input) else {
            let dialog = Dialog::new(DialogKind::Warning, "Input Error", "Please enter a YouTube Video ID");
            return (
                Self {
                    dialog: Some(dialog),
                    ..self
                },
                None,
            );
        };

        let next = Self {
            input: self.input,
            status: Status::Working(Stage::Metadata),
            ..Self::default()
        };
        (next, Some(video_id))
    }

    pub fn progress(self, progress: Progress) -> Self {
        if !self.is_running() {
            return self;
        }
        match progress {
            Progress::Stage(stage) => Self {
                status: Status::Working(stage),
                ..self
            },
            Progress::Metadata(metadata) => Self {
                metadata: Some(metadata),
                ..self
            },
            Progress::Thumbnail(thumbnail) => Self {
                thumbnail: Some(thumbnail),
                ..self
            },
        }
    }

    pub fn finish(self, result: Result<Report, PipelineError>) -> Self {
        if !self.is_running() {
            return self;
        }
        match result {
            Ok(report) => Self {
                status: Status::Done,
                metadata: Some(report.metadata),
                summary: Some(report.summary),
                ..self
            },
            Err(err) => Self {
                status: Status::Failed(err.stage()),
                dialog: Some(Dialog::new(DialogKind::Error, "Error", err.to_string())),
                ..self
            },
        }
    }

    pub fn cancel(self) -> Self {
        if !self.is_running() {
            return self;
        }
        Self {
            status: Status::Cancelled,
            ..self
        }
    }

    /// Exact text to place on the clipboard, if a summary is shown
    pub fn clipboard_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn copied(self) -> Self {
        Self {
            dialog: Some(Dialog::new(DialogKind::Info, "Copied", "Summary copied to clipboard!")),
            ..self
        }
    }

    pub fn dismiss(self) -> Self {
        Self { dialog: None, ..self }
    }

    pub fn clear(self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Never Gonna Give You Up".to_string(),
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string()),
        }
    }

    fn thumbnail() -> Thumbnail {
        Thumbnail {
            width: 320,
            height: 180,
            rgba: vec![7; 320 * 180 * 4],
        }
    }

    fn running() -> Session {
        let (session, id) = Session::with_input("dQw4w9WgXcQ").submit();
        assert_eq!(id.as_deref(), Some("dQw4w9WgXcQ"));
        session
    }

    fn completed(summary: &str) -> Session {
        running()
            .progress(Progress::Metadata(metadata()))
            .progress(Progress::Thumbnail(thumbnail()))
            .progress(Progress::Stage(Stage::Transcript))
            .progress(Progress::Stage(Stage::Summary))
            .finish(Ok(Report {
                metadata: metadata(),
                summary: summary.to_string(),
            }))
    }

    #[test]
    fn test_blank_input_warns_and_does_not_start() {
        let (session, id) = Session::with_input("   ").submit();
        assert!(id.is_none());
        assert_eq!(session.status, Status::Idle);
        let dialog = session.dialog.unwrap();
        assert_eq!(dialog.kind, DialogKind::Warning);
        assert_eq!(dialog.message, "Please enter a YouTube Video ID");
    }

    #[test]
    fn test_submit_clears_previous_output() {
        let session = completed("old summary").edit("https://youtu.be/aaaaaaaaaaa".to_string());
        let (session, id) = session.submit();
        assert_eq!(id.as_deref(), Some("aaaaaaaaaaa"));
        assert_eq!(session.input, "https://youtu.be/aaaaaaaaaaa");
        assert_eq!(session.status, Status::Working(Stage::Metadata));
        assert!(session.metadata.is_none());
        assert!(session.thumbnail.is_none());
        assert!(session.summary.is_none());
    }

    #[test]
    fn test_submit_while_running_is_ignored() {
        let (session, id) = running().submit();
        assert!(id.is_none());
        assert!(session.is_running());
    }

    #[test]
    fn test_status_text_follows_stages() {
        let session = running();
        assert_eq!(session.status.text(), "Fetching video info...");
        let session = session.progress(Progress::Stage(Stage::Transcript));
        assert_eq!(session.status.text(), "Fetching transcript...");
        let session = session.progress(Progress::Stage(Stage::Summary));
        assert_eq!(session.status.text(), "Generating summary...");
        assert_eq!(session.status.tone(), Tone::Progress);
    }

    #[test]
    fn test_successful_run_shows_outputs_verbatim() {
        let session = completed("Overview.\n\n- one\n- two\n");
        assert_eq!(session.metadata, Some(metadata()));
        assert_eq!(session.thumbnail, Some(thumbnail()));
        assert_eq!(session.summary.as_deref(), Some("Overview.\n\n- one\n- two\n"));
        assert_eq!(session.status, Status::Done);
        assert_eq!(session.status.text(), "Done!");
        assert_eq!(session.status.tone(), Tone::Success);
        assert!(session.dialog.is_none());
    }

    #[test]
    fn test_missing_video_shows_details_dialog() {
        let session = running().finish(Err(PipelineError::VideoDetails));
        let dialog = session.dialog.clone().unwrap();
        assert_eq!(dialog.kind, DialogKind::Error);
        assert_eq!(
            dialog.message,
            "Couldn't fetch video details. Check:\n1. Video ID\n2. YouTube API key"
        );
        assert_eq!(session.status, Status::Failed(Stage::Metadata));
        assert!(session.metadata.is_none());
        assert!(session.summary.is_none());
    }

    #[test]
    fn test_missing_transcript_shows_transcript_dialog() {
        let session = running()
            .progress(Progress::Metadata(metadata()))
            .progress(Progress::Stage(Stage::Transcript))
            .finish(Err(PipelineError::Transcript));
        assert_eq!(
            session.dialog.unwrap().message,
            "No English transcript available for this video"
        );
        // title stays visible, nothing else is filled in
        assert_eq!(session.metadata, Some(metadata()));
        assert!(session.summary.is_none());
    }

    #[test]
    fn test_summary_failure_dialog_names_reason() {
        let session = running().finish(Err(PipelineError::Summary("rate limited".to_string())));
        assert_eq!(session.dialog.unwrap().message, "Summary failed: rate limited");
    }

    #[test]
    fn test_clipboard_text_keeps_trailing_whitespace() {
        let session = completed("Summary body\n\n  ");
        assert_eq!(session.clipboard_text(), Some("Summary body\n\n  "));
    }

    #[test]
    fn test_clipboard_text_without_summary() {
        assert_eq!(Session::default().clipboard_text(), None);
    }

    #[test]
    fn test_copied_shows_info_dialog_and_keeps_summary() {
        let session = completed("text").copied();
        assert_eq!(session.dialog.as_ref().unwrap().kind, DialogKind::Info);
        assert_eq!(session.summary.as_deref(), Some("text"));
        assert_eq!(session.dismiss().dialog, None);
    }

    #[test]
    fn test_clear_restores_pristine_state() {
        let session = completed("text").copied().clear();
        assert_eq!(session, Session::default());
        assert_eq!(session.input, "");
        assert_eq!(session.status.text(), "");
        assert!(session.metadata.is_none());
        assert!(session.thumbnail.is_none());
        assert!(session.summary.is_none());
    }

    #[test]
    fn test_cancel_stops_accepting_events() {
        let session = running().cancel();
        assert_eq!(session.status, Status::Cancelled);
        let session = session
            .progress(Progress::Metadata(metadata()))
            .finish(Ok(Report {
                metadata: metadata(),
                summary: "late".to_string(),
            }));
        assert!(session.metadata.is_none());
        assert!(session.summary.is_none());
        assert_eq!(session.status, Status::Cancelled);
    }
}
