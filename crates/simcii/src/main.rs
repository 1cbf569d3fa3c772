mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simcii_config::Config;
use simcii_core::{Dashboard, DashboardConfig};

use crate::cli::{Cli, Command, GlobalOpts, WatchArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't talk to the services
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "simcii", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs a dashboard
        cmd => {
            let mut cfg = load_config(&cli.global)?;
            if let Command::Watch(WatchArgs {
                refresh_ms: Some(ms),
                ..
            }) = &cmd
            {
                cfg.refresh_interval_ms = *ms;
            }
            let dashboard = Dashboard::new(build_dashboard_config(&cfg, &cli.global)?)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &dashboard, &cli.global).await
        }
    }
}

/// Load the config file (or `--config`) plus `SIMCII_*` env overrides.
pub(crate) fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(simcii_config::config_path);
    Ok(simcii_config::load_config_from(&path)?)
}

/// Apply CLI flag overrides on top of the loaded config.
fn build_dashboard_config(cfg: &Config, global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let mut cfg = cfg.clone();
    if let Some(ref url) = global.inventory_url {
        cfg.inventory_url.clone_from(url);
    }
    if let Some(ref url) = global.statistics_url {
        cfg.statistics_url.clone_from(url);
    }
    if global.timeout.is_some() {
        cfg.timeout_secs = global.timeout;
    }
    Ok(cfg.to_dashboard_config()?)
}
