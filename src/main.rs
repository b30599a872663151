//! # reply-segmenter CLI
//!
//! Command-line front end for the reply segmenter: segment saved model
//! replies, split inline code, strip reasoning blocks, and wrap TTS audio.

mod cli;
mod run;

use clap::Parser;
use dotenv::dotenv;

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    // Print user-friendly message; exit uses Display not Debug
    let config = reply_segmenter::core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = run::run(args, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
