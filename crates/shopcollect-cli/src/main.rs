mod captures;
mod collect;
mod session;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shopcollect_core::CollectMode;
use shopcollect_scraper::CapturePlacement;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopcollect")]
#[command(about = "Collect shop ranking rows from captured pages and export them as CSV")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Single,
    Multi,
}

impl From<ModeArg> for CollectMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => CollectMode::Single,
            ModeArg::Multi => CollectMode::Multi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlacementArg {
    Primary,
    Embedded,
}

impl From<PlacementArg> for CapturePlacement {
    fn from(placement: PlacementArg) -> Self {
        match placement {
            PlacementArg::Primary => CapturePlacement::Primary,
            PlacementArg::Embedded => CapturePlacement::Embedded,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one collection over a directory of captures and export the result.
    Collect {
        /// Directory of `*.html` captures, one per result page, in name order.
        #[arg(long)]
        captures: PathBuf,
        #[arg(long, value_enum, default_value_t = ModeArg::Multi)]
        mode: ModeArg,
        /// Number of pages to walk in multi mode.
        #[arg(long)]
        pages: Option<u32>,
        /// Render captures in the primary document or inside an iframe.
        #[arg(long, value_enum, default_value_t = PlacementArg::Embedded)]
        placement: PlacementArg,
        /// Skip writing the CSV export.
        #[arg(long)]
        no_export: bool,
    },
    /// Read JSON commands from stdin; write acks and status events to stdout.
    Session {
        #[arg(long)]
        captures: PathBuf,
        #[arg(long, value_enum, default_value_t = PlacementArg::Embedded)]
        placement: PlacementArg,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = shopcollect_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let local = tokio::task::LocalSet::new();
    match cli.command {
        Some(Commands::Collect {
            captures,
            mode,
            pages,
            placement,
            no_export,
        }) => {
            local
                .run_until(collect::run_collect(
                    &config,
                    &captures,
                    placement.into(),
                    mode.into(),
                    pages,
                    !no_export,
                ))
                .await
        }
        Some(Commands::Session {
            captures,
            placement,
        }) => {
            local
                .run_until(session::run_session(&config, &captures, placement.into()))
                .await
        }
        None => {
            println!("shopcollect: pass `collect` or `session`; see --help");
            Ok(())
        }
    }
}
