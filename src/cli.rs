//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use reply_segmenter::core::render::OutputFormat;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  reply-segmenter segment reply.md              Show the segments of a saved reply
  cat reply.md | reply-segmenter segment -f json
  reply-segmenter inline note.txt               Split inline `code` spans
  reply-segmenter thinking reply.md             Separate <think> blocks from the answer
  reply-segmenter wav speech.pcm -o speech.wav  Wrap TTS PCM audio in a WAV header
  reply-segmenter config                        Show effective configuration
  reply-segmenter completions bash              Generate bash completions

ENVIRONMENT (also read from .env):
  REPLY_SEGMENTER_MIN_CODE_LEN, REPLY_SEGMENTER_FORMAT,
  REPLY_SEGMENTER_WIDTH, REPLY_SEGMENTER_SAMPLE_RATE
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Split LLM replies into text, code, and image segments",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Segment a reply into text, code, and image blocks
    Segment {
        /// Reply file ('-' or omitted reads stdin)
        input: Option<PathBuf>,
        /// Output format (overrides REPLY_SEGMENTER_FORMAT)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Minimum length of an unfenced code block
        #[arg(long)]
        min_code_len: Option<usize>,
        /// Wrap width for text output (0 disables wrapping)
        #[arg(short, long)]
        width: Option<usize>,
        /// Segment <think> blocks too instead of stripping them first
        #[arg(long)]
        keep_thoughts: bool,
    },
    /// Split text into plain and inline-code pieces (JSON)
    Inline {
        /// Text file ('-' or omitted reads stdin)
        input: Option<PathBuf>,
    },
    /// Separate reasoning blocks from the answer (JSON)
    Thinking {
        /// Reply file ('-' or omitted reads stdin)
        input: Option<PathBuf>,
    },
    /// Wrap raw PCM audio in a WAV header
    Wav {
        /// Raw PCM file ('-' reads stdin)
        input: PathBuf,
        /// Destination WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// PCM mime type, e.g. "audio/L16;codec=pcm;rate=24000"
        #[arg(long, conflicts_with_all = ["rate", "channels"])]
        mime: Option<String>,
        /// Sample rate in Hz (overrides REPLY_SEGMENTER_SAMPLE_RATE)
        #[arg(long)]
        rate: Option<u32>,
        /// Channel count
        #[arg(long)]
        channels: Option<u16>,
    },
    /// Show effective configuration
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
