// SPDX-License-Identifier: MIT

//! cvrank CLI: submit résumés and keywords to the evaluation backend and
//! print the ranked candidate scores.

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use cvrank::client::EvalClient;
use cvrank::config::AppConfig;
use cvrank::session::{EvalSession, ResumeFile, SubmitOutcome};

/// cvrank CLI - Résumé screening client
#[derive(Parser, Debug)]
#[command(name = "cvrank")]
#[command(version = "0.3.0")]
#[command(about = "Submit résumés and keywords for evaluation and rank the results", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate résumé files against a set of keywords
    Evaluate {
        /// Résumé files, directories, or glob patterns
        files: Vec<String>,

        /// Keyword to match against (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// File with one keyword per line
        #[arg(long)]
        keywords_file: Option<PathBuf>,

        /// Also include the configured suggested keywords
        #[arg(short = 'S', long)]
        suggested: bool,

        /// Override the configured API base URL
        #[arg(long)]
        api_base: Option<String>,
    },

    /// List the configured suggested keywords
    Suggestions,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Evaluate {
            files,
            keywords,
            keywords_file,
            suggested,
            api_base,
        } => {
            run_evaluate(
                config, files, keywords, keywords_file, suggested, api_base, &cli.format,
            )
            .await
        }
        Commands::Suggestions => {
            for s in &config.suggested_keywords {
                println!("{}", s);
            }
            Ok(())
        }
        Commands::Config { action } => run_config_command(config, action, &cli.config),
    }
}

/// Run an evaluation and print the ranked results
async fn run_evaluate(
    config: AppConfig,
    file_args: Vec<String>,
    keywords: Vec<String>,
    keywords_file: Option<PathBuf>,
    suggested: bool,
    api_base: Option<String>,
    format: &str,
) -> anyhow::Result<()> {
    let mut session = EvalSession::new();

    session.add_files(collect_files(&file_args)?);

    for kw in &keywords {
        session.add_keyword(kw);
    }
    if let Some(path) = keywords_file {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read keywords file {:?}", path))?;
        for line in content.lines() {
            session.add_keyword(line);
        }
    }
    if suggested {
        for s in &config.suggested_keywords {
            session.add_suggestion(s);
        }
    }

    let base_url = api_base.unwrap_or(config.api.base_url);
    let client = EvalClient::new(&base_url, config.api.timeout_secs)?;

    let outcome = session.submit(&client).await;

    match outcome {
        SubmitOutcome::Succeeded => {
            render_results(&session, format);
            Ok(())
        }
        SubmitOutcome::Rejected | SubmitOutcome::Failed => {
            anyhow::bail!("{}", session.status.error_msg)
        }
        // A fresh session has nothing in flight
        SubmitOutcome::Busy => unreachable!("no concurrent submission in the CLI"),
    }
}

/// Resolve file arguments into résumé uploads.
///
/// Each argument may be a file, a directory (expanded non-recursively), or
/// a glob pattern. Unreadable entries are skipped with a warning rather
/// than aborting the whole set.
fn collect_files(args: &[String]) -> anyhow::Result<Vec<ResumeFile>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for arg in args {
        let path = Path::new(arg);
        if path.is_file() {
            paths.push(path.to_path_buf());
        } else if path.is_dir() {
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {:?}", path))?
            {
                let p = entry?.path();
                if p.is_file() {
                    paths.push(p);
                }
            }
        } else {
            let mut matched = false;
            for entry in glob::glob(arg).with_context(|| format!("Bad file pattern {:?}", arg))? {
                match entry {
                    Ok(p) if p.is_file() => {
                        paths.push(p);
                        matched = true;
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Skipping unreadable match: {}", e),
                }
            }
            if !matched {
                warn!("No files matched {:?}", arg);
            }
        }
    }

    let mut files = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "resume".to_string());
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!("Loaded {:?} ({} bytes)", path, bytes.len());
                files.push(ResumeFile { name, bytes });
            }
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }

    Ok(files)
}

/// Print the ranked rows in the requested format
fn render_results(session: &EvalSession, format: &str) {
    match format {
        "json" => {
            let output = serde_json::json!({
                "evaluated_at": Local::now().to_rfc3339(),
                "results": session.results(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        }
        "jsonl" => {
            for row in session.results() {
                if let Ok(line) = serde_json::to_string(row) {
                    println!("{}", line);
                }
            }
        }
        _ => {
            println!("Ranking ({} candidates, {}):",
                session.results().len(),
                Local::now().format("%Y-%m-%d %H:%M"));
            for (i, row) in session.results().iter().enumerate() {
                println!("{:>3}. [{}] {}  {}/100", i + 1, row.initials(), row.candidate, row.score);
                if !row.explanation.is_empty() {
                    println!("     {}", row.explanation);
                }
            }
            if !session.status.success_msg.is_empty() {
                info!("{}", session.status.success_msg);
            }
        }
    }
}

/// Run config commands
fn run_config_command(
    config: AppConfig,
    action: ConfigCommands,
    config_path: &Path,
) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            let default_config = AppConfig::default();
            default_config.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            println!("Configuration at {:?} is valid", config_path);
            println!("  API base URL: {}", config.api.base_url);
            println!("  Timeout: {}s", config.api.timeout_secs);
            println!("  Suggested keywords: {:?}", config.suggested_keywords);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["cvrank", "suggestions"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_cli_evaluate_command() {
        let cli = Cli::try_parse_from([
            "cvrank", "evaluate", "cv1.pdf", "cv2.pdf", "-k", "rust", "-k", "sql", "--suggested",
        ])
        .unwrap();

        match cli.command {
            Commands::Evaluate { files, keywords, suggested, .. } => {
                assert_eq!(files, vec!["cv1.pdf", "cv2.pdf"]);
                assert_eq!(keywords, vec!["rust", "sql"]);
                assert!(suggested);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_cli_config_command() {
        let cli = Cli::try_parse_from(["cvrank", "config", "show"]).unwrap();
        match cli.command {
            Commands::Config { action: ConfigCommands::Show } => {}
            _ => panic!("Expected Config Show command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cvrank", "--format", "yaml", "suggestions"]).is_err());
    }

    #[test]
    fn test_collect_files_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"pdf bytes").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"txt bytes").unwrap();

        let files = collect_files(&[dir.path().to_string_lossy().to_string()]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_files_glob_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"pdf").unwrap();
        std::fs::write(dir.path().join("b.docx"), b"docx").unwrap();

        let pattern = format!("{}/*.pdf", dir.path().display());
        let files = collect_files(&[pattern]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.pdf");
    }

    #[test]
    fn test_collect_files_missing_pattern_is_empty() {
        let files = collect_files(&["/nonexistent/*.pdf".to_string()]).unwrap();
        assert!(files.is_empty());
    }
}
