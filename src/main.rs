use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dwmstat::config::AppConfig;
use dwmstat::core::constants::SIGNAL_CHANNEL_CAPACITY;
use dwmstat::core::{create_sink, send_signal, Scheduler, SignalListener};
use dwmstat::{build_modules, describe_module};
use dwmstat_types::SinkConfig;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the runtime waits for blocking module executions on exit
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// dwmstat - update scheduler for the dwm status bar
#[derive(Parser, Debug)]
#[command(name = "dwmstat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0", global = true)]
    debug: u8,

    /// Print the status line to stdout instead of the configured sink
    #[arg(long)]
    stdout: bool,

    /// Write the default configuration and exit
    #[arg(long = "write-default-config")]
    write_default_config: bool,

    /// Config file to load instead of the one in the config directory
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Force a module (by name or signal id) of a running instance to update
    Signal {
        /// Module name or signal id
        target: String,

        /// Signal socket, defaults to the configured one
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },
    /// List the configured modules and their schedule
    List,
}

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("dwmstat: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.write_default_config {
        return write_default_config(cli.config_file.as_deref());
    }

    let mut config = load_config(cli.config_file.as_deref())?;
    if cli.stdout {
        config.sink = SinkConfig::Stdout;
    }

    match cli.command {
        Some(Command::List) => {
            for module in build_modules(&config)? {
                println!("{}", describe_module(module.as_ref()));
            }
            Ok(())
        }
        Some(Command::Signal { target, socket }) => {
            let socket = socket.unwrap_or(config.socket_path);
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(send_signal(&socket, &target))?;
            Ok(())
        }
        None => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            let result = runtime.block_on(run_bar(config));
            // A module stuck in a blocking call must not keep the process alive
            runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
            result
        }
    }
}

/// Load configuration - from the given file if specified, otherwise from
/// the default location
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let config = AppConfig::load_from_path(path)?;
            info!("Loaded config from: {:?}", path);
            Ok(config)
        }
        None => AppConfig::load(),
    }
}

fn write_default_config(path: Option<&Path>) -> Result<()> {
    let config = AppConfig::default();
    let path = match path {
        Some(path) => {
            config.save_to_path(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };
    println!("Wrote default config to {}", path.display());
    Ok(())
}

async fn run_bar(config: AppConfig) -> Result<()> {
    warn!("Starting dwmstat v{}", env!("CARGO_PKG_VERSION"));

    let modules = build_modules(&config)?;
    // Socket errors are fatal before any module is scheduled
    let listener = SignalListener::bind(&config.socket_path)?;
    let sink = create_sink(&config.sink);
    info!("Rendering to {} sink", config.sink.sink_type());

    let scheduler = Scheduler::start(modules, config.to_scheduler_config(), sink).await?;

    let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
    let listener_task = tokio::spawn(listener.run(signal_tx));

    tokio::select! {
        _ = scheduler.route_signals(signal_rx) => warn!("Signal listener stopped"),
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Interrupted, shutting down"),
            Err(e) => error!("Failed to wait for Ctrl-C: {}", e),
        },
    }

    // Dropping the listener removes the socket file
    listener_task.abort();
    let _ = listener_task.await;
    scheduler.shutdown().await;
    Ok(())
}
