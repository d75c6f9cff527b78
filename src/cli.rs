use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytsummary",
    about = "Summarize YouTube videos with an LLM",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID (prefills the window input)
    pub url: Option<String>,

    /// Summarize without opening a window and print the result
    #[arg(long)]
    pub headless: bool,

    /// Headless output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write headless output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preferred manual caption languages, highest priority first
    #[arg(short, long, value_delimiter = ',')]
    pub lang: Vec<String>,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Show progress and config details on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headless_args() {
        let cli = Cli::try_parse_from([
            "ytsummary",
            "--headless",
            "-f",
            "json",
            "--lang",
            "en,de",
            "--model",
            "llama-3.3-70b-versatile",
            "dQw4w9WgXcQ",
        ])
        .unwrap();
        assert!(cli.headless);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.lang, vec!["en", "de"]);
        assert_eq!(cli.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert_eq!(cli.url.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ytsummary"]).unwrap();
        assert!(!cli.headless);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.lang.is_empty());
        assert!(cli.url.is_none());
    }
}
