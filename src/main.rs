use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytsummary::app::{self, App};
use ytsummary::config::{self, Config, LLM_API_KEY_VAR, YOUTUBE_API_KEY_VAR};
use ytsummary::pipeline::{Pipeline, Progress};
use ytsummary::thumbnail::HttpThumbnails;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsummary.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsummary")
        .join("logs")
}

fn key_status(var: &str) -> String {
    match config::api_key(var) {
        Ok(_) => format!("  \x1b[32m✅\x1b[0m {var:<16} set"),
        Err(_) => format!("  \x1b[31m❌\x1b[0m {var:<16} (not set)"),
    }
}

fn build_after_help() -> String {
    format!(
        "\nAPI KEYS:\n{}\n{}\n\nConfig is read from: {}\nLogs are written to: {}",
        key_status(YOUTUBE_API_KEY_VAR),
        key_status(LLM_API_KEY_VAR),
        config::config_path().display(),
        log_dir().join("ytsummary.log").display()
    )
}

fn run_headless(cli: &Cli, client: &reqwest::Client, config: &Config) -> Result<()> {
    let Some(video_id) = cli.url.as_deref().and_then(ytsummary::normalize_input) else {
        bail!("no URL or video ID provided\n\nUsage: ytsummary --headless <URL>");
    };

    let pipeline = Pipeline::from_config(client, config);
    let verbose = cli.verbose;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(pipeline.run(&video_id, |progress| {
        if !verbose {
            return;
        }
        match progress {
            Progress::Stage(stage) => eprintln!("{}", stage.status_text()),
            Progress::Metadata(metadata) => eprintln!("Video: {} ({})", metadata.title, metadata.video_id),
            Progress::Thumbnail(_) => {}
        }
    }))?;

    let rendered = match cli.format {
        OutputFormat::Text => ytsummary::output::render_text(&report),
        OutputFormat::Json => ytsummary::output::render_json(&report)?,
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring invalid config: {e}");
        Config::default()
    });

    // CLI flags take priority over the config file
    if let Some(ref model) = cli.model {
        config.model = Some(model.clone());
    }
    if !cli.lang.is_empty() {
        config.languages = Some(cli.lang.clone());
    }
    debug!("Effective config: {config:?}");

    if cli.verbose {
        let config_path = config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Model: {} via {}", config.model(), config.base_url());
    }

    let client = reqwest::Client::new();

    if cli.headless {
        return run_headless(&cli, &client, &config);
    }

    let thumbnails = Arc::new(HttpThumbnails::new(client.clone(), config.request_timeout()));
    let pipeline = Arc::new(Pipeline::from_config(&client, &config).with_thumbnails(thumbnails));
    let input = cli.url.unwrap_or_default();

    iced::application(app::WINDOW_TITLE, App::update, App::view)
        .theme(App::theme)
        .window_size((900.0, 800.0))
        .run_with(move || App::new(pipeline, input))?;

    Ok(())
}
