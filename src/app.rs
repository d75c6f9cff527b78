use std::sync::Arc;

use iced::futures::{SinkExt, Stream};
use iced::widget::{
    button, center, column, container, horizontal_space, image, opaque, row, scrollable, stack, text, text_input,
};
use iced::{Alignment, Color, Element, Length, Task, Theme};
use log::{debug, info, warn};

use crate::Report;
use crate::pipeline::{Pipeline, PipelineError, Progress};
use crate::session::{DialogKind, Session, Tone};
use crate::thumbnail::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};

pub const WINDOW_TITLE: &str = "YouTube Summary Pro";

const HIGHLIGHT: Color = Color { r: 0.420, g: 0.549, b: 0.808, a: 1.0 };
const SUCCESS: Color = Color { r: 0.298, g: 0.686, b: 0.314, a: 1.0 };
const ERROR: Color = Color { r: 0.957, g: 0.263, b: 0.212, a: 1.0 };
const PROGRESS: Color = Color { r: 1.0, g: 0.596, b: 0.0, a: 1.0 };
const MUTED: Color = Color { r: 0.667, g: 0.667, b: 0.667, a: 1.0 };

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Submit,
    Cancel,
    /// Progress from the job with the given id
    Progress(u64, Progress),
    Finished(u64, Result<Report, PipelineError>),
    Copy,
    Clear,
    DismissDialog,
}

pub struct App {
    pipeline: Arc<Pipeline>,
    session: Session,
    /// GPU handle for `session.thumbnail`, rebuilt only when the thumbnail changes
    thumbnail: Option<image::Handle>,
    job: Option<iced::task::Handle>,
    /// Id of the current job; messages tagged with any other id are stale
    job_id: u64,
}

impl App {
    pub fn new(pipeline: Arc<Pipeline>, input: String) -> (Self, Task<Message>) {
        let app = Self {
            pipeline,
            session: Session::with_input(input),
            thumbnail: None,
            job: None,
            job_id: 0,
        };
        (app, Task::none())
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let session = std::mem::take(&mut self.session);
        match message {
            Message::InputChanged(input) => self.session = session.edit(input),
            Message::Submit => {
                let (session, video_id) = session.submit();
                self.session = session;
                self.sync_thumbnail();
                if let Some(video_id) = video_id {
                    self.job_id += 1;
                    info!("Summarizing {video_id} (job {})", self.job_id);
                    let stream = run_pipeline(self.pipeline.clone(), self.job_id, video_id);
                    let (task, handle) = Task::run(stream, |m| m).abortable();
                    self.job = Some(handle);
                    return task;
                }
            }
            Message::Cancel => {
                self.abort_job();
                self.session = session.cancel();
            }
            Message::Progress(id, _) | Message::Finished(id, _) if id != self.job_id => {
                debug!("Ignoring message from stale job {id}");
                self.session = session;
            }
            Message::Progress(_, progress) => {
                self.session = session.progress(progress);
                self.sync_thumbnail();
            }
            Message::Finished(_, result) => {
                self.job = None;
                if let Err(e) = &result {
                    warn!("Pipeline failed: {e}");
                }
                self.session = session.finish(result);
            }
            Message::Copy => match session.clipboard_text().map(str::to_string) {
                Some(text) => {
                    self.session = session.copied();
                    return iced::clipboard::write(text);
                }
                None => self.session = session,
            },
            Message::Clear => {
                self.abort_job();
                self.session = session.clear();
                self.thumbnail = None;
            }
            Message::DismissDialog => self.session = session.dismiss(),
        }
        Task::none()
    }

    fn abort_job(&mut self) {
        if let Some(handle) = self.job.take() {
            handle.abort();
        }
        self.job_id += 1;
    }

    fn sync_thumbnail(&mut self) {
        self.thumbnail = match (&self.session.thumbnail, self.thumbnail.take()) {
            (None, _) => None,
            (Some(_), Some(handle)) => Some(handle),
            (Some(t), None) => Some(image::Handle::from_rgba(t.width, t.height, t.rgba.clone())),
        };
    }

    pub fn view(&self) -> Element<'_, Message> {
        let session = &self.session;
        let blocked = session.dialog.is_some();
        let running = session.is_running();

        let header = column![
            text(WINDOW_TITLE).size(26).color(HIGHLIGHT),
            text("Get AI-powered summaries of YouTube videos").size(14),
        ]
        .spacing(4)
        .align_x(Alignment::Center)
        .width(Length::Fill);

        let mut input = text_input("YouTube Video ID or URL", &session.input).padding(8);
        if !blocked && !running {
            input = input
                .on_input(Message::InputChanged)
                .on_submit(Message::Submit);
        }

        let action = if running {
            button("Cancel").on_press_maybe((!blocked).then_some(Message::Cancel))
        } else {
            button("Summarize").on_press_maybe((!blocked).then_some(Message::Submit))
        };

        let input_row = row![text("YouTube Video ID or URL:"), input, action.padding(8)]
            .spacing(10)
            .align_y(Alignment::Center);

        let status_color = match session.status.tone() {
            Tone::Neutral => MUTED,
            Tone::Progress => PROGRESS,
            Tone::Success => SUCCESS,
            Tone::Error => ERROR,
        };
        let status = text(session.status.text()).size(13).color(status_color);

        let title = text(session.metadata.as_ref().map(|m| m.title.as_str()).unwrap_or_default()).size(18);

        let thumbnail = self.thumbnail.as_ref().map(|handle| {
            image(handle.clone())
                .width(Length::Fixed(THUMBNAIL_WIDTH as f32))
                .height(Length::Fixed(THUMBNAIL_HEIGHT as f32))
        });

        let video = column![title]
            .push_maybe(thumbnail)
            .spacing(10)
            .align_x(Alignment::Center)
            .width(Length::Fill);

        let has_summary = session.summary.is_some();
        let summary_header = row![
            text("AI Summary").size(20).color(HIGHLIGHT),
            horizontal_space(),
            button("Copy").on_press_maybe((!blocked && has_summary).then_some(Message::Copy)),
            button("Clear").on_press_maybe((!blocked).then_some(Message::Clear)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let summary = container(scrollable(
            text(session.summary.as_deref().unwrap_or_default()).size(14),
        ))
        .padding(15)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(container::rounded_box);

        let footer = row![horizontal_space(), text("© YouTube Summary Pro").size(11).color(MUTED)];

        let base = column![header, input_row, status, video, summary_header, summary, footer]
            .spacing(14)
            .padding(20);

        match &session.dialog {
            Some(dialog) => {
                let title_color = match dialog.kind {
                    DialogKind::Info => SUCCESS,
                    DialogKind::Warning => PROGRESS,
                    DialogKind::Error => ERROR,
                };
                let card = container(
                    column![
                        text(&dialog.title).size(18).color(title_color),
                        text(&dialog.message),
                        row![horizontal_space(), button("OK").on_press(Message::DismissDialog)],
                    ]
                    .spacing(12),
                )
                .width(Length::Fixed(420.0))
                .padding(20)
                .style(container::rounded_box);
                modal(base, card)
            }
            None => base.into(),
        }
    }
}

/// Overlay `content` on a dimmed, click-blocking copy of `base`
fn modal<'a>(base: impl Into<Element<'a, Message>>, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(center(opaque(content)).style(|_theme| container::Style {
            background: Some(Color { a: 0.7, ..Color::BLACK }.into()),
            ..container::Style::default()
        }))
    ]
    .into()
}

/// Run the pipeline in the background, streaming progress back as messages
fn run_pipeline(pipeline: Arc<Pipeline>, job_id: u64, video_id: String) -> impl Stream<Item = Message> {
    iced::stream::channel(16, move |mut output| async move {
        let result = pipeline
            .run(&video_id, |progress| {
                if let Err(e) = output.try_send(Message::Progress(job_id, progress)) {
                    warn!("Dropped progress update: {e}");
                }
            })
            .await;
        if output.send(Message::Finished(job_id, result)).await.is_err() {
            warn!("Window closed before pipeline finished");
        }
    })
}
