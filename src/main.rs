//! `keyer` command-line entry point.
//!
//! Subcommands:
//! 1. `console` - interactive keyer over stdin, real time
//! 2. `script` - run console commands from a file in virtual time
//! 3. `send` - play text and exit
//! 4. `table` - print the Morse table

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cw_paddle_keyer::console::{self, ScriptSession};
use cw_paddle_keyer::morse::{self, Category};
use cw_paddle_keyer::{KeyerConfig, Runtime, TraceSink};

#[derive(Parser)]
#[command(name = "keyer")]
#[command(about = "Iambic Morse keyer with gap decoder")]
#[command(version = env!("VERSION_STRING"))]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Speed in words per minute
    #[arg(long, global = true)]
    wpm: Option<u32>,

    /// Sidetone frequency in Hz
    #[arg(long, global = true)]
    frequency: Option<u32>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console
    Console,
    /// Run console commands from a file
    Script { file: PathBuf },
    /// Send text as Morse
    Send { text: String },
    /// Print the Morse table
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    info!(version = env!("VERSION_STRING"), "keyer starting");

    match cli.command {
        Commands::Console => run_console(config).await,
        Commands::Script { file } => run_script(config, &file),
        Commands::Send { text } => run_send(config, &text).await,
        Commands::Table => {
            print_table();
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<KeyerConfig> {
    let mut config = match &cli.config {
        Some(path) => KeyerConfig::load(path)?,
        None => KeyerConfig::default(),
    };
    if let Some(wpm) = cli.wpm {
        config.wpm = wpm;
    }
    if let Some(frequency) = cli.frequency {
        config.frequency_hz = frequency;
    }

    let clamped = config.clamped();
    if clamped != config {
        tracing::warn!(?config, ?clamped, "configuration clamped to supported range");
    }
    Ok(clamped)
}

async fn run_console(config: KeyerConfig) -> Result<()> {
    let (handle, task) = Runtime::spawn(config, TraceSink::new(config.frequency_hz));

    // Echo decoded text as it grows
    let mut watcher = handle.clone();
    let echo = tokio::spawn(async move {
        let mut shown = String::new();
        while let Ok(snapshot) = watcher.changed().await {
            if snapshot.decoded_text != shown {
                println!("> {}", snapshot.decoded_text);
                shown = snapshot.decoded_text;
            }
        }
    });

    println!("keyer {} - type 'help' for commands, 'quit' to exit", env!("VERSION_STRING"));

    // `send` waits for the runtime's answer, so commands run off the async workers
    let mut console_handle = handle.clone();
    let reader = tokio::task::spawn_blocking(move || -> Result<()> {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if matches!(line.trim(), "quit" | "exit") {
                break;
            }
            let mut out = String::new();
            if let Err(err) = console::run_line(&line, &mut console_handle, &mut out) {
                out.push_str(&format!("{err}\n"));
            }
            print!("{out}");
        }
        Ok(())
    });
    reader.await.context("console thread failed")??;

    handle.shutdown();
    task.await.context("runtime task failed")?;
    echo.abort();
    Ok(())
}

fn run_script(config: KeyerConfig, file: &Path) -> Result<()> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("reading script {}", file.display()))?;

    let mut session = ScriptSession::new(config, TraceSink::new(config.frequency_hz));
    for (lineno, line) in script.lines().enumerate() {
        let mut out = String::new();
        if let Err(err) = console::run_line(line, &mut session, &mut out) {
            out.push_str(&format!("line {}: {err}\n", lineno + 1));
        }
        print!("{out}");
    }
    session.finish();

    println!("{}", session.session().decoded_text());
    Ok(())
}

async fn run_send(config: KeyerConfig, text: &str) -> Result<()> {
    let (mut handle, task) = Runtime::spawn(config, TraceSink::new(config.frequency_hz));

    handle.send(text).await.context("starting send")?;
    handle.wait_send_complete().await?;

    handle.shutdown();
    task.await.context("runtime task failed")?;
    Ok(())
}

fn print_table() {
    for category in Category::ALL {
        println!("{}:", category.as_str());
        for entry in morse::entries(category) {
            println!("  {}  {}", entry.character, entry.symbols);
        }
    }
}
