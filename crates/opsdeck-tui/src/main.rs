//! `opsdeck-tui` -- terminal dashboard for the opsdeck administration server.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `opsdeck-core`'s [`EntityStream`](opsdeck_core::EntityStream). Screens
//! are navigable via number keys (1-5): Board, Tickets, Users, Org, and
//! Promotions.
//!
//! Logs are written to a file (default `/tmp/opsdeck-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task continuously
//! streams entity updates from the controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use opsdeck_core::Controller;

use crate::app::App;

/// Terminal dashboard for managing users, tickets, and project boards.
#[derive(Parser, Debug)]
#[command(name = "opsdeck-tui", version, about)]
struct Cli {
    /// Server profile to use (defaults to the config's default profile)
    #[arg(short = 'p', long, env = "OPSDECK_PROFILE")]
    profile: Option<String>,

    /// Log file path (defaults to /tmp/opsdeck-tui.log)
    #[arg(long, default_value = "/tmp/opsdeck-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr -- that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("opsdeck_tui={log_level}")));

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("opsdeck-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Build a [`Controller`] from the shared config file.
fn build_controller(cli: &Cli) -> Result<Controller> {
    let cfg = opsdeck_config::load_config_or_default();
    let profile_name = opsdeck_config::active_profile_name(cli.profile.as_deref(), &cfg);

    let profile = cfg.profiles.get(&profile_name).ok_or_else(|| {
        eyre!(
            "profile '{profile_name}' not found -- create one with: opsdeck config init"
        )
    })?;

    let server_config = opsdeck_config::profile_to_server_config(profile, &profile_name)
        .map_err(|e| eyre!("{e}"))?;

    Ok(Controller::new(server_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file -- hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        profile = cli.profile.as_deref().unwrap_or("(default)"),
        "starting opsdeck-tui"
    );

    let controller = build_controller(&cli)?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
