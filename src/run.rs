//! Command handlers: logger init, input reading, and one function per subcommand.

use std::io::{self, Read, Write};
use std::path::Path;

use clap::CommandFactory;

use reply_segmenter::core::app;
use reply_segmenter::core::config::Config;
use reply_segmenter::core::render::{self, OutputFormat};
use reply_segmenter::core::wav::{PcmFormat, WavError, pcm_to_wav};
use reply_segmenter::{SegmentOptions, segment_with, split_inline_code, split_thinking};

use crate::cli::{Args, Commands};

/// Errors surfaced to the user by a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Wav(#[from] WavError),
}

/// Initialize env_logger. Logs go to stderr so stdout stays machine-readable.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn read_bytes(path: Option<&Path>) -> Result<Vec<u8>, RunError> {
    match path.filter(|p| *p != Path::new("-")) {
        Some(path) => std::fs::read(path).map_err(|source| RunError::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|source| RunError::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// Read text input; invalid UTF-8 is replaced rather than rejected.
fn read_text(path: Option<&Path>) -> Result<String, RunError> {
    let bytes = read_bytes(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Input is not valid UTF-8; replacing invalid sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

fn print(out: &str) -> Result<(), RunError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    if !out.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Dispatch the parsed command.
pub fn run(args: Args, config: &Config) -> Result<(), RunError> {
    match args.command {
        Commands::Segment {
            input,
            format,
            min_code_len,
            width,
            keep_thoughts,
        } => run_segment(
            input.as_deref(),
            SegmentRequest {
                format: format.unwrap_or(config.format),
                min_code_len: min_code_len.unwrap_or(config.min_code_len),
                width: width.unwrap_or(config.width),
                keep_thoughts,
            },
        ),
        Commands::Inline { input } => run_inline(input.as_deref()),
        Commands::Thinking { input } => run_thinking(input.as_deref()),
        Commands::Wav {
            input,
            output,
            mime,
            rate,
            channels,
        } => {
            let format = match mime {
                Some(m) => PcmFormat::from_mime(&m)?,
                None => PcmFormat {
                    sample_rate: rate.unwrap_or(config.sample_rate),
                    channels: channels.unwrap_or(1),
                    ..PcmFormat::default()
                },
            };
            run_wav(&input, &output, format)
        }
        Commands::Config => run_config(config),
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            crate::cli::generate(shell, &mut cmd, app::NAME, &mut io::stdout());
            Ok(())
        }
    }
}

/// Settings for one `segment` invocation, after CLI flags override config.
pub struct SegmentRequest {
    pub format: OutputFormat,
    pub min_code_len: usize,
    pub width: usize,
    pub keep_thoughts: bool,
}

pub fn run_segment(input: Option<&Path>, request: SegmentRequest) -> Result<(), RunError> {
    let raw = read_text(input)?;
    let reply = if request.keep_thoughts {
        raw
    } else {
        let split = split_thinking(&raw);
        if let Some(thoughts) = &split.thoughts {
            log::info!("Stripped {} chars of reasoning", thoughts.chars().count());
        }
        split.answer
    };

    let options = SegmentOptions {
        min_heuristic_len: request.min_code_len,
    };
    let segments = segment_with(&reply, &options);
    log::info!("{} segment(s)", segments.len());

    let out = match request.format {
        OutputFormat::Json => render::to_json(&segments)?,
        OutputFormat::Text => render::render_text(&segments, request.width),
    };
    print(&out)
}

pub fn run_inline(input: Option<&Path>) -> Result<(), RunError> {
    let text = read_text(input)?;
    let pieces = split_inline_code(&text);
    print(&render::to_json(&pieces)?)
}

pub fn run_thinking(input: Option<&Path>) -> Result<(), RunError> {
    let raw = read_text(input)?;
    let split = split_thinking(&raw);
    if !split.complete {
        log::warn!("Reasoning block was never closed");
    }
    print(&render::to_json(&split)?)
}

pub fn run_wav(input: &Path, output: &Path, format: PcmFormat) -> Result<(), RunError> {
    let pcm = read_bytes(Some(input))?;
    let wav = pcm_to_wav(&pcm, format)?;
    std::fs::write(output, &wav).map_err(|source| RunError::Write {
        path: output.display().to_string(),
        source,
    })?;
    log::info!(
        "Wrote {} ({} bytes, {:.2}s at {} Hz)",
        output.display(),
        wav.len(),
        format.duration_secs(pcm.len()),
        format.sample_rate
    );
    Ok(())
}

pub fn run_config(config: &Config) -> Result<(), RunError> {
    let format = match config.format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
    };
    print(&format!(
        "{} {}\n\nmin_code_len: {}\nformat:       {}\nwidth:        {}\nsample_rate:  {}",
        app::NAME,
        app::VERSION,
        config.min_code_len,
        format,
        config.width,
        config.sample_rate
    ))
}
