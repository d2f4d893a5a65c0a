//! CLI module for Tekste.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tekste - Subtitle Generation Service
///
/// Turns video URLs into translated SRT subtitle files. Run as an HTTP
/// service with background jobs, or generate subtitles one-off from the
/// command line. The name "Tekste" comes from the Norwegian verb for
/// "to subtitle."
#[derive(Parser, Debug)]
#[command(name = "tekste")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Tekste and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Generate a translated subtitle file for one video
    Generate {
        /// Video URL to subtitle
        url: String,

        /// Target language code (default from config, usually "pt")
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Where to write the .srt file (default: ./subtitles_<job_id>.srt)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run the HTTP API server with background job processing
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}
