use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::indexer::Scanner;
use crate::models::{DateKey, SessionFile};
use crate::parsers::parse_session_file;
use crate::refresher::{Refresher, refresh_all};
use crate::search::SearchIndex;
use crate::utils::{format_path_with_tilde, sanitize_for_terminal};

#[derive(Parser)]
#[command(name = "codex-sessions")]
#[command(version)]
#[command(about = "Browse and search Codex CLI session logs", long_about = None)]
pub struct Cli {
    /// Path to the Codex sessions directory [default: ~/.codex/sessions]
    #[arg(long, global = true, value_name = "DIR")]
    pub sessions_dir: Option<String>,

    /// Do not trim user messages to the request marker
    #[arg(long, global = true)]
    pub full: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List session dates, newest first
    Dates,
    /// List the session files of one date
    List {
        /// Date as yyyy-mm-dd
        date: DateKey,
    },
    /// Show session counts per working directory
    Dirs,
    /// Print the conversation timeline of one session
    Show {
        /// Date as yyyy-mm-dd
        date: DateKey,
        /// Session file name
        file: String,
    },
    /// Search message content
    Search {
        query: String,
        /// Maximum number of results (0 for the default, capped at 200)
        #[arg(short, long, default_value_t = 0)]
        limit: usize,
    },
    /// Show statistics about the sessions directory
    Stats,
    /// Keep rescanning the sessions directory until interrupted
    Watch {
        /// Seconds between rescans [default: 120]
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

pub fn run() -> Result<()> {
    execute(Cli::parse())
}

pub fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };
    let config = Config::resolve(cli.sessions_dir.as_deref(), cli.full)?;

    match command {
        Commands::Dates => show_dates(&config),
        Commands::List { date } => list_sessions(&config, &date),
        Commands::Dirs => show_dirs(&config),
        Commands::Show { date, file } => show_session(&config, &date, &file),
        Commands::Search { query, limit } => run_search(&config, &query, limit),
        Commands::Stats => show_stats(&config),
        Commands::Watch { interval } => {
            let config = match interval {
                Some(secs) => config.with_rescan_interval(Duration::from_secs(secs))?,
                None => config,
            };
            watch(&config)
        }
    }
}

fn scan(config: &Config) -> Result<Scanner> {
    let scanner = Scanner::new(&config.sessions_dir);
    scanner.refresh()?;
    Ok(scanner)
}

fn show_dates(config: &Config) -> Result<()> {
    let scanner = scan(config)?;
    let snapshot = scanner.snapshot();
    if snapshot.is_empty() {
        println!("No sessions found in {}", format_path_with_tilde(scanner.root()));
        return Ok(());
    }
    for date in snapshot.dates() {
        let count = snapshot.sessions_by_date(date).len();
        println!("{}  {:>4} {}", date, count, plural(count, "session", "sessions"));
    }
    Ok(())
}

fn list_sessions(config: &Config, date: &DateKey) -> Result<()> {
    let scanner = scan(config)?;
    let files = scanner.sessions_by_date(date);
    if files.is_empty() {
        bail!("No sessions for {date}");
    }
    for file in &files {
        println!("{}", describe_file(file));
    }
    Ok(())
}

fn describe_file(file: &SessionFile) -> String {
    format!(
        "{}  {:>9}  {}  {}",
        file.modified.format("%H:%M:%S"),
        file.size,
        sanitize_for_terminal(&file.name),
        sanitize_for_terminal(file.cwd_key())
    )
}

fn show_dirs(config: &Config) -> Result<()> {
    let scanner = scan(config)?;
    for (cwd, count) in scanner.working_directory_counts() {
        println!("{:>5}  {}", count, sanitize_for_terminal(&cwd));
    }
    Ok(())
}

fn show_session(config: &Config, date: &DateKey, name: &str) -> Result<()> {
    let scanner = scan(config)?;
    let file = scanner
        .lookup(date, name)
        .with_context(|| format!("Session not found: {}/{}", date.path(), name))?;
    let session = parse_session_file(&file.path, config.parse_options())?;

    println!("Session: {}", format_path_with_tilde(&file.path));
    if let Some(meta) = &session.meta {
        if !meta.id.is_empty() {
            println!("Id: {}", sanitize_for_terminal(&meta.id));
        }
        if !meta.cwd.is_empty() {
            println!("Working directory: {}", sanitize_for_terminal(&meta.cwd));
        }
        if !meta.cli_version.is_empty() {
            println!("CLI version: {}", sanitize_for_terminal(&meta.cli_version));
        }
        if let Some(command) = meta.resume_command() {
            println!();
            println!("{}", sanitize_for_terminal(&command));
        }
    }

    for entry in &session.entries {
        println!();
        println!(
            "--- {} (line {}) {}",
            entry.title,
            entry.line,
            sanitize_for_terminal(&entry.timestamp)
        );
        println!("{}", sanitize_for_terminal(&entry.content));
    }
    Ok(())
}

fn run_search(config: &Config, query: &str, limit: usize) -> Result<()> {
    let scanner = scan(config)?;
    let index = SearchIndex::new(config.parse_options());
    let stats = index.refresh_from_snapshot(&scanner.snapshot());
    if !stats.failures.is_empty() {
        eprintln!("Warning: {} session file(s) could not be indexed", stats.failures.len());
    }

    let results = index.search(query, limit);
    if results.is_empty() {
        println!("No matches");
        return Ok(());
    }
    for result in &results {
        println!(
            "{} {}:{} [{}] {}",
            result.date,
            sanitize_for_terminal(&result.file),
            result.line,
            sanitize_for_terminal(&result.role),
            sanitize_for_terminal(&result.preview)
        );
    }
    Ok(())
}

fn show_stats(config: &Config) -> Result<()> {
    let scanner = scan(config)?;
    let index = SearchIndex::new(config.parse_options());
    let stats = index.refresh_from_snapshot(&scanner.snapshot());
    let snapshot = scanner.snapshot();

    println!("Codex Session Statistics");
    println!("========================");
    println!("Dates: {}", snapshot.dates().len());
    println!("Session files: {}", snapshot.len());
    println!("Working directories: {}", snapshot.working_directories().len());
    println!("Searchable entries: {}", index.len());
    if !stats.failures.is_empty() {
        println!("Unreadable files: {}", stats.failures.len());
    }
    println!();
    println!("Sessions directory: {}", format_path_with_tilde(scanner.root()));

    if let Some(newest) = snapshot.dates().first() {
        println!("Newest date: {newest}");
    }
    if let Some(oldest) = snapshot.dates().last() {
        println!("Oldest date: {oldest}");
    }
    Ok(())
}

fn watch(config: &Config) -> Result<()> {
    let scanner = Arc::new(Scanner::new(&config.sessions_dir));
    let search = Arc::new(SearchIndex::new(config.parse_options()));

    let report = refresh_all(&scanner, &search);
    if report.scan.is_none() {
        bail!("Initial scan of {} failed", format_path_with_tilde(scanner.root()));
    }

    let _refresher =
        Refresher::spawn(Arc::clone(&scanner), Arc::clone(&search), config.rescan_interval)?;
    info!(
        root = %scanner.root().display(),
        interval_secs = config.rescan_interval.as_secs(),
        "watching sessions"
    );
    println!(
        "Watching {} ({} files, {} searchable entries). Press Ctrl-C to stop.",
        format_path_with_tilde(scanner.root()),
        scanner.snapshot().len(),
        search.len()
    );

    loop {
        thread::park();
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
