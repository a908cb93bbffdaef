use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::ValueEnum;
use eyre::{Result, bail};
use log::{debug, info, warn};

use ytsum::summarize::{self, HuggingFace};
use ytsum::youtube::YouTube;
use ytsum::{Dispatcher, ModelHandle, Report};

mod cli;

use cli::{Cli, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

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
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let token_set = std::env::var(summarize::TOKEN_ENV).is_ok_and(|t| !t.trim().is_empty());

    let token_line = if token_set {
        format!("  \x1b[32m✅\x1b[0m {}   set", summarize::TOKEN_ENV)
    } else {
        format!(
            "  \x1b[31m❌\x1b[0m {}   (not set, needed for summarization)",
            summarize::TOKEN_ENV
        )
    };

    format!(
        "\nREQUIRED ENVIRONMENT:\n{token_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytsum::config::config_path().display(),
        log_dir().join("ytsum.log").display()
    )
}

fn render(report: &Report, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => ytsum::output::render_text(report),
        OutputFormat::Markdown => ytsum::output::render_markdown(report),
        OutputFormat::Json => ytsum::output::render_json(report)?,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_else(|e| {
        warn!("Ignoring invalid config: {e}");
        ytsum::config::Config::default()
    });

    // CLI flags take priority over config
    let lang = cli
        .lang
        .clone()
        .or(config.default_lang.clone())
        .unwrap_or_else(|| ytsum::DEFAULT_LANG.to_string());
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
        })
        .unwrap_or(OutputFormat::Text);
    let model = cli
        .model
        .clone()
        .or(config.model.clone())
        .unwrap_or_else(|| summarize::DEFAULT_MODEL.to_string());
    let endpoint = config
        .endpoint
        .clone()
        .unwrap_or_else(|| summarize::DEFAULT_ENDPOINT.to_string());

    if cli.verbose {
        let config_path = ytsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Model: {model}\nLanguage: {lang}");
    }
    debug!("Resolved settings: lang={lang} format={format:?} model={model} endpoint={endpoint}");

    let client = reqwest::Client::new();
    let model_client = client.clone();
    let handle = ModelHandle::lazy(move || {
        HuggingFace::from_env(model_client.clone(), &endpoint, &model)
    });
    let dispatcher = Dispatcher::new(YouTube::new(client), handle, lang);

    // Collect URLs: from arg or stdin, one request per line
    let inputs: Box<dyn Iterator<Item = io::Result<String>>> = match cli.url.clone() {
        Some(url) => Box::new(std::iter::once(Ok(url))),
        None => Box::new(io::stdin().lock().lines()),
    };

    let mut handled = 0usize;
    let mut failed = 0usize;
    let mut rendered = Vec::new();

    for url_input in inputs {
        let url_input = url_input?;
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }
        handled += 1;

        if cli.verbose {
            eprintln!("Getting video transcript and analyzing content: {url_input}");
        }

        let report = match dispatcher.handle(url_input).await {
            Ok(report) => report,
            Err(e) => {
                failed += 1;
                warn!("Request failed for {url_input}: {e}");
                eprintln!("Error: {e}\n\n{}", e.hint());
                continue;
            }
        };

        if cli.verbose {
            eprintln!(
                "Video: {} ({})\nLanguage: {}{}{}\nKey points: {}",
                report.title,
                report.video_id,
                report.language,
                if report.is_generated { ", auto-generated captions" } else { "" },
                report
                    .translated_from
                    .as_deref()
                    .map(|from| format!(" (translated from {from})"))
                    .unwrap_or_default(),
                report.summaries.len(),
            );
        }

        let output = render(&report, format)?;
        if cli.output.is_some() {
            rendered.push(output);
        } else {
            println!("{output}");
        }
    }

    if handled == 0 {
        bail!("no URL provided\n\nUsage: ytsum <URL>\n       echo <URL> | ytsum");
    }

    if let Some(ref path) = cli.output {
        if !rendered.is_empty() {
            std::fs::write(path, rendered.join("\n\n"))?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {handled} requests failed");
    }

    Ok(())
}
