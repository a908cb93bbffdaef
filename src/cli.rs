use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize a YouTube video into numbered key points from its captions",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (reads one URL per line from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), markdown, json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Language to summarize in; other captions are translated into it [default: en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hugging Face summarization model [default: facebook/bart-large-cnn]
    #[arg(long)]
    pub model: Option<String>,

    /// Show progress and transcript metadata
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_and_flags() {
        let cli = Cli::try_parse_from([
            "ytsum",
            "https://youtu.be/dQw4w9WgXcQ",
            "-f",
            "json",
            "-l",
            "de",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.lang.as_deref(), Some("de"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_defaults_left_unset() {
        let cli = Cli::try_parse_from(["ytsum"]).unwrap();
        assert!(cli.url.is_none());
        assert!(cli.format.is_none());
        assert!(cli.model.is_none());
    }
}
