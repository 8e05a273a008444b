//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads the scoring context (classifier + threshold)
//! - dispatches to the TUI form or the one-shot CLI commands

use clap::Parser;

use crate::cli::{Command, ScoreArgs, TemplateArgs};
use crate::config::{ArtifactPaths, log_file_path};
use crate::domain::BorrowerProfile;
use crate::error::{AppError, EXIT_CONFIG, EXIT_RUNTIME};

pub mod logging;
pub mod scoring;

use logging::LogTarget;
use scoring::ScoringContext;

/// Entry point for the `ldr` binary.
pub fn run() -> Result<(), AppError> {
    // `ldr` and `ldr --model m.json` behave like `ldr tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let paths = ArtifactPaths::resolve(cli.model, cli.threshold);

    let target = log_target(&cli.command);
    // stderr already shows fatal errors; only the TUI log file needs a copy.
    let log_fatal = matches!(target, LogTarget::File(_));
    logging::init(target);

    let result = match cli.command {
        Command::Tui => handle_tui(&paths),
        Command::Score(args) => handle_score(&paths, args),
        Command::Info => handle_info(&paths),
        Command::Template(args) => handle_template(args),
    };

    if let Err(err) = &result {
        if log_fatal {
            log::error!("{err}");
        }
    }
    result
}

/// The TUI owns the terminal, so it logs to a file; one-shot commands log to stderr.
fn log_target(command: &Command) -> LogTarget {
    match command {
        Command::Tui => LogTarget::File(log_file_path()),
        Command::Score(_) | Command::Info | Command::Template(_) => LogTarget::Stderr,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Text,
    Json,
}

fn handle_tui(paths: &ArtifactPaths) -> Result<(), AppError> {
    // Startup errors halt before the terminal is taken over.
    let ctx = ScoringContext::load(paths)?;
    crate::tui::run(&ctx)
}

fn handle_score(paths: &ArtifactPaths, args: ScoreArgs) -> Result<(), AppError> {
    let mode = if args.json { OutputMode::Json } else { OutputMode::Text };

    let request = match &args.input {
        Some(path) => {
            if !args.profile.is_empty() {
                return Err(AppError::new(
                    EXIT_CONFIG,
                    "Use either --input or borrower field flags, not both.",
                ));
            }
            crate::io::read_request_json(path)?
        }
        None => args.profile.to_profile().to_request(),
    };

    let ctx = ScoringContext::load(paths)?;
    let result = ctx.score(&request)?;

    match mode {
        OutputMode::Text => {
            println!("{}", crate::report::format_score(&result, ctx.threshold()));
        }
        OutputMode::Json => {
            let report = crate::report::ScoreReport::new(&result, ctx.threshold(), ctx.classifier().name());
            let text = serde_json::to_string_pretty(&report)
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to serialize result: {e}")))?;
            println!("{text}");
        }
    }

    Ok(())
}

fn handle_info(paths: &ArtifactPaths) -> Result<(), AppError> {
    let ctx = ScoringContext::load(paths)?;
    print!("{}", crate::report::format_model_info(&ctx));
    Ok(())
}

fn handle_template(args: TemplateArgs) -> Result<(), AppError> {
    let request = BorrowerProfile::default().to_request();
    match &args.out {
        Some(path) => {
            crate::io::write_request_json(path, &request)?;
            log::info!("wrote request template to {}", path.display());
        }
        None => {
            let text = serde_json::to_string_pretty(&request.to_json())
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to serialize template: {e}")))?;
            println!("{text}");
        }
    }
    Ok(())
}

/// Rewrite argv so `ldr` defaults to `ldr tui`.
///
/// Rules:
/// - `ldr`                       -> `ldr tui`
/// - `ldr --model m.json ...`    -> `ldr tui --model m.json ...`
/// - `ldr --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "score" | "info" | "template");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
