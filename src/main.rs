//! MonAgent main entry point
//!
//! Command-line interface for running extractions, serving the HTTP API and
//! chatting with the responder.

use anyhow::Context;
use clap::{Parser, Subcommand};
use monagent::bot::ChatBot;
use monagent::config::{load_named_config_with_hash, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_NAME};
use monagent::pipeline::run_with_config;
use monagent::record::FlatRow;
use monagent::server::{self, AppState};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// MonAgent: a polite business information extractor
///
/// Fetches one business page under its robots.txt policy, stores the
/// extracted rows as CSV and answers questions about them.
#[derive(Parser, Debug)]
#[command(name = "monagent")]
#[command(version)]
#[command(about = "A polite business information extractor", long_about = None)]
struct Cli {
    /// Directory holding <name>.toml configurations
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Also write logs to <LOG_DIR>/<config>.log
    #[arg(long, global = true, value_name = "LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one extraction and store its rows
    Scrape {
        /// Configuration name
        #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
        config: String,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to bind (host:port)
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: String,

        /// Configuration used by /scrape when none is named, and by /chat
        #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
        config: String,
    },

    /// Ask the responder; reads questions from stdin when none is given
    Chat {
        #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
        config: String,

        /// Question to ask
        message: Vec<String>,
    },

    /// Validate a configuration and show what a run would do
    CheckConfig {
        #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
        config: String,
    },
}

impl Command {
    fn config_name(&self) -> &str {
        match self {
            Self::Scrape { config }
            | Self::Serve { config, .. }
            | Self::Chat { config, .. }
            | Self::CheckConfig { config } => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(
        cli.verbose,
        cli.quiet,
        cli.log_dir.as_deref(),
        cli.command.config_name(),
    )?;

    match cli.command {
        Command::Scrape { config } => handle_scrape(&cli.config_dir, &config).await,
        Command::Serve { bind, config } => handle_serve(cli.config_dir, config, &bind).await,
        Command::Chat { config, message } => handle_chat(&cli.config_dir, &config, &message),
        Command::CheckConfig { config } => handle_check_config(&cli.config_dir, &config),
    }
}

/// Sets up the tracing subscriber, plus a log file when `log_dir` is given
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_dir: Option<&Path>,
    config_name: &str,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("monagent=info,warn"),
            1 => EnvFilter::new("monagent=debug,info"),
            2 => EnvFilter::new("monagent=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter).with(console);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log dir {}", dir.display()))?;
            let appender =
                tracing_appender::rolling::never(dir, format!("{}.log", config_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}

async fn handle_scrape(config_dir: &Path, name: &str) -> anyhow::Result<()> {
    let result = run_with_config(config_dir, name)
        .await
        .with_context(|| format!("run of '{}' failed", name))?;

    println!("Rows: {}", result.rows);
    println!("Output: {}", result.path.display());
    if let Some(hash) = &result.config_hash {
        println!("Config hash: {}", hash);
    }
    let sample: Vec<FlatRow> = result.sample.iter().map(FlatRow::from).collect();
    println!("Sample: {}", serde_json::to_string_pretty(&sample)?);
    Ok(())
}

async fn handle_serve(config_dir: PathBuf, name: String, bind: &str) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config_dir, name));
    state.reload_bot().await;
    server::serve(bind, state).await
}

fn handle_chat(config_dir: &Path, name: &str, message: &[String]) -> anyhow::Result<()> {
    let (config, _) = load_named_config_with_hash(config_dir, name)?;
    let bot = ChatBot::from_store(Path::new(&config.storage.path)).with_context(|| {
        format!(
            "no stored rows at {}; run `monagent scrape --config {}` first",
            config.storage.path, name
        )
    })?;

    if !message.is_empty() {
        println!("{}", bot.reply(&message.join(" ")));
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if !line.is_empty() {
            println!("{}", bot.reply(line));
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}

fn handle_check_config(config_dir: &Path, name: &str) -> anyhow::Result<()> {
    let (config, hash) = load_named_config_with_hash(config_dir, name)?;

    println!("=== MonAgent Configuration Check ===\n");
    println!("Name: {}", name);
    println!("Hash: {}", hash);
    println!("Site: {}", config.site_name);
    println!("Target: {}", config.target_url);
    println!("Mode: {}", config.mode.as_str());
    println!("Parse mode: {:?}", config.parse_mode);
    println!("Crawler identity: {}", config.crawler_identity);
    println!("Retry: {} (delay {}s)", config.retry, config.delay);
    println!("Output: {}", config.storage.path);
    println!("\n✓ Configuration is valid");
    Ok(())
}
