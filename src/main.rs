//! EmberKV - An In-Memory Key-Value Store with a Redis-Style Shell
//!
//! This is the main entry point for the EmberKV shell.
//! It sets up logging, creates the store, and runs a session over stdin/stdout.

use clap::Parser;
use emberkv::commands::help::INSTRUCTIONS;
use emberkv::commands::CommandHandler;
use emberkv::session::{Session, DEFAULT_PROMPT};
use emberkv::storage::Store;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Shell configuration
#[derive(Debug, Parser)]
#[command(name = "emberkv", version, about = "An in-memory key-value store with a Redis-style shell")]
struct Config {
    /// Don't print the banner or the prompt (useful when piping commands in)
    #[arg(short, long)]
    quiet: bool,

    /// Prompt written before each command
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Log filter, e.g. "debug" or "emberkv=trace". Logs go to stderr.
    #[arg(long, env = "EMBERKV_LOG", default_value = "warn")]
    log: String,
}

fn print_banner() {
    println!(
        r#"
EmberKV v{} - In-Memory Key-Value Store
──────────────────────────────────────────────────────────────
{}

Data lives in memory only and is lost on EXIT.
"#,
        emberkv::VERSION,
        INSTRUCTIONS
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::parse();

    // Set up logging on stderr so stdout stays a clean transcript
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if !config.quiet {
        print_banner();
    }

    // The store lives for the whole process; nothing is persisted
    let handler = CommandHandler::new(Store::new());
    info!("Store initialized");

    let prompt = (!config.quiet).then_some(config.prompt);
    let session = Session::new(tokio::io::stdin(), tokio::io::stdout(), handler).with_prompt(prompt);

    tokio::select! {
        result = session.run() => {
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Interrupt received, exiting");
        }
    }

    Ok(())
}
