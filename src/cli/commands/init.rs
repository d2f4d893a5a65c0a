//! Init command - first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::Command;

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tekste Setup");
    println!();

    // Prerequisites
    println!("{}", style("Checking prerequisites").bold().cyan());
    let mut missing = Vec::new();
    for tool in ["yt-dlp", "ffmpeg", "ffprobe"] {
        let version_arg = if tool == "yt-dlp" { "--version" } else { "-version" };
        if Command::new(tool).arg(version_arg).output().is_err() {
            missing.push(tool);
            println!("  {} {} - not found", style("✗").red(), style(tool).bold());
        } else {
            println!("  {} {}", style("✓").green(), tool);
        }
    }
    if !missing.is_empty() {
        Output::warning("Install the missing tools before generating subtitles.");
    }
    println!();

    // API key
    println!("{}", style("Checking API configuration").bold().cyan());
    if std::env::var("OPENAI_API_KEY").is_ok() {
        Output::success("OpenAI API key is configured.");
    } else {
        Output::warning("OPENAI_API_KEY is not set (required for Whisper transcription).");
        println!("  Set it with: {}", style("export OPENAI_API_KEY='sk-...'").green());
    }
    println!();

    // Directories
    println!("{}", style("Setting up directories").bold().cyan());
    for dir in [settings.data_dir(), settings.temp_dir(), settings.downloads_dir()] {
        if dir.exists() {
            Output::info(&format!("Exists: {}", dir.display()));
        } else {
            std::fs::create_dir_all(&dir)?;
            Output::success(&format!("Created: {}", dir.display()));
        }
    }
    println!();

    // Config file
    println!("{}", style("Configuration file").bold().cyan());
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Exists: {}", config_path.display()));
    } else {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created: {}", config_path.display()));
    }
    println!();

    println!("{}", style("Setup complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("tekste doctor").cyan());
    println!("  {} Generate subtitles for a video", style("tekste generate <url>").cyan());
    println!("  {} Run the API server", style("tekste serve").cyan());

    Ok(())
}
