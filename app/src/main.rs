//! windowscope: live view of a region of another window.
//!
//! ```text
//! windowscope <config.json>    Monitor the configured window, commands on stdin
//! windowscope --list           List capturable windows
//! windowscope --gen-config     Print an example config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use windowscope_lib::{init_logging, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "windowscope", about = "Live view of a region of another window")]
struct Cli {
    /// Path to a JSON file with `monitor` and optional `settings`.
    config: Option<PathBuf>,

    /// List visible windows with their handles and exit.
    #[arg(long)]
    list: bool,

    /// Print an example configuration and exit.
    #[arg(long)]
    gen_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", serde_json::to_string_pretty(&AppConfig::example())?);
        return Ok(());
    }

    init_logging();
    info!("windowscope v{}", env!("CARGO_PKG_VERSION"));
    run(cli)
}

#[cfg(windows)]
fn run(cli: Cli) -> anyhow::Result<()> {
    use std::io;
    use std::thread;

    use anyhow::Context;
    use windowscope_engine::create_engine;
    use windowscope_ipc::{command_channel, event_channel};
    use windowscope_lib::{log_events, read_commands};

    if cli.list {
        for window in windowscope_capture::enumerate_windows()? {
            println!(
                "{:>12}  {:>5}x{:<5}  {}",
                window.handle.to_string(),
                window.width,
                window.height,
                window.title
            );
        }
        return Ok(());
    }

    let path = cli
        .config
        .context("A config file is required (see --gen-config and --list)")?;
    let config = AppConfig::load(&path)?;
    info!(
        window = %config.monitor.window,
        region = ?config.monitor.region,
        "Loaded config from {}",
        path.display()
    );

    let (command_tx, command_rx) = command_channel();
    let (event_tx, event_rx) = event_channel();

    let engine = create_engine(config.monitor, config.settings, event_tx)?;

    let logger = thread::Builder::new()
        .name("windowscope-events".to_string())
        .spawn(move || log_events(event_rx))?;
    thread::Builder::new()
        .name("windowscope-console".to_string())
        .spawn(move || read_commands(io::stdin().lock(), command_tx))?;

    engine.start()?;
    engine.run(command_rx);
    drop(engine);

    let _ = logger.join();
    info!("windowscope exiting");
    Ok(())
}

#[cfg(not(windows))]
fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(path) = cli.config {
        AppConfig::load(&path)?;
        info!("Config {} is valid", path.display());
    }
    info!(list = cli.list, "windowscope capture is only supported on Windows");
    Ok(())
}
