//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    hint: Option<String>,
}

#[derive(Debug, PartialEq)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tekste Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    for tool in ["yt-dlp", "ffmpeg", "ffprobe"] {
        let check = check_tool(tool);
        check.print();
        checks.push(check);
    }

    println!();
    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    println!();
    println!("{}", style("Job Store").bold());
    let store_check = check_job_store(settings);
    store_check.print();
    checks.push(store_check);

    println!();
    println!("{}", style("Directories").bold());
    for (name, dir) in [
        ("data", settings.data_dir()),
        ("temp", settings.temp_dir()),
        ("downloads", settings.downloads_dir()),
    ] {
        let check = if dir.exists() {
            CheckResult::ok(name, &format!("{}", dir.display()))
        } else {
            CheckResult::warning(
                name,
                &format!("{} does not exist", dir.display()),
                "Run 'tekste init' to create it",
            )
        };
        check.print();
        checks.push(check);
    }

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Tekste.",
            errors
        ));
    } else if warnings > 0 {
        Output::warning(&format!("{} warning(s) found.", warnings));
    } else {
        Output::success("All checks passed!");
    }

    Ok(())
}

fn check_tool(name: &str) -> CheckResult {
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => CheckResult::ok(name, "installed"),
        Ok(_) => CheckResult::error(name, "installed but not working", install_hint(name)),
        Err(_) => CheckResult::error(name, "not found", install_hint(name)),
    }
}

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "yt-dlp" => {
            if cfg!(target_os = "macos") {
                "Install with: brew install yt-dlp"
            } else {
                "Install with: pip install yt-dlp"
            }
        }
        _ => {
            if cfg!(target_os = "macos") {
                "Install with: brew install ffmpeg"
            } else {
                "Install with: sudo apt install ffmpeg"
            }
        }
    }
}

fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => CheckResult::ok("OPENAI_API_KEY", "configured"),
        _ => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Whisper transcription requires it: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

fn check_job_store(settings: &Settings) -> CheckResult {
    match settings.jobs.provider.as_str() {
        "memory" => CheckResult::warning(
            "provider",
            "memory (records are lost on restart)",
            "Set [jobs] provider = \"sqlite\" for durable, expiring records",
        ),
        "sqlite" => CheckResult::ok(
            "provider",
            &format!("sqlite ({})", settings.jobs_sqlite_path().display()),
        ),
        other => CheckResult::error(
            "provider",
            &format!("unknown provider '{}'", other),
            "Use \"memory\" or \"sqlite\"",
        ),
    }
}
