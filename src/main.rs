use anyhow::Context;
use clap::{Parser, Subcommand};
use rewatch::config::WatchConfig;
use rewatch::logger::{ConsoleSink, LogSink};
use rewatch::process::Supervisor;
use rewatch::trigger;
use rewatch::watcher::FileWatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Rewatch - rerun a command whenever watched files change
#[derive(Parser)]
#[command(name = "rewatch")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the configured paths and supervise the post-change command
    Run {
        /// Path to the configuration file
        #[arg(short, long, default_value = "rewatch.toml")]
        config: PathBuf,
    },

    /// Validate the configuration file and exit
    Check {
        /// Path to the configuration file
        #[arg(short, long, default_value = "rewatch.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config } => run(&config).await,
        Commands::Check { config } => check(&config),
    }
}

async fn run(path: &Path) -> anyhow::Result<()> {
    let config = WatchConfig::from_file(path).context("failed to load configuration")?;
    let sink: Arc<dyn LogSink> = Arc::new(ConsoleSink);

    let (tx, rx) = trigger::channel();
    let watcher = FileWatcher::new(&config);
    let supervisor = Supervisor::new(config, sink);

    let watcher_task = tokio::spawn(watcher.run(tx));
    let mut supervisor_task = tokio::spawn(supervisor.run(rx));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            // Ending the watcher drops the trigger sender; the supervisor
            // loop sees the closed channel, kills the current child, and
            // returns.
            watcher_task.abort();
            supervisor_task.await??;
        }
        result = &mut supervisor_task => {
            watcher_task.abort();
            result??;
        }
    }

    Ok(())
}

fn check(path: &Path) -> anyhow::Result<()> {
    let config = WatchConfig::from_file(path).context("failed to load configuration")?;
    println!(
        "configuration OK: {} ({} watch path(s))",
        config.config_file_name,
        config.watch_paths.len()
    );
    Ok(())
}
