//! Lexi-Crawl main entry point
//!
//! This is the command-line interface: it loads the configuration, then runs the
//! interactive search shell on stdin.

use clap::Parser;
use lexi_crawl::config::{load_config_with_hash, Config};
use lexi_crawl::shell::{Command, Reply, Shell};
use lexi_crawl::state::{InterruptRouter, StopHandle};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "\n(search)> ";

/// Lexi-Crawl: a polite single-site crawler and word index
///
/// Crawls one website while respecting its robots.txt, builds an inverted
/// index of the words on its pages and answers ranked queries from a shell.
#[derive(Parser, Debug)]
#[command(name = "lexi-crawl")]
#[command(version)]
#[command(about = "A polite single-site crawler and search shell", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((config, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    run_shell(Shell::new(config)).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lexi_crawl=info,warn"),
            1 => EnvFilter::new("lexi_crawl=debug,info"),
            2 => EnvFilter::new("lexi_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads commands from stdin until `exit`, end of input, or Ctrl-C at the prompt
async fn run_shell(mut shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", shell.intro());

    let router = InterruptRouter::new();
    let quit = Arc::new(Notify::new());
    let listener = spawn_interrupt_listener(router.clone(), quit.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = quit.notified() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let command = Command::parse(&line);

        let reply = if command == Command::Build {
            println!("Building index, this may take an hour or more. Press Ctrl-C to stop early.");
            let stop = router.arm();
            let reply = shell.execute(command, stop).await;
            router.disarm();
            reply
        } else {
            shell.execute(command, StopHandle::new()).await
        };

        match reply {
            Ok(Reply::Output(text)) => {
                if !text.is_empty() {
                    println!("{}", text.trim_end());
                }
            }
            Ok(Reply::Exit(text)) => {
                println!("{}", text);
                break;
            }
            Err(e) => println!("{}", e),
        }
    }

    listener.abort();
    Ok(())
}

/// Handles Ctrl-C for the whole session
///
/// During `build` it stops the crawl after the current page; at the prompt it
/// ends the session.
fn spawn_interrupt_listener(router: InterruptRouter, quit: Arc<Notify>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if router.interrupt() {
                tracing::warn!("Interrupt received, stopping crawl after the current page");
            } else {
                quit.notify_one();
                break;
            }
        }
    })
}
