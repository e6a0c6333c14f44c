//! One-shot collection over a directory of captures.

use std::path::Path;

use shopcollect_core::{AppConfig, CollectMode, CollectStatus};
use shopcollect_scraper::CapturePlacement;

use crate::captures::build_collector;

/// Collects from the captures in `dir`, printing progress, then exports.
///
/// # Errors
///
/// Returns an error if the captures cannot be loaded, the run ends with an
/// error, or the export cannot be written.
pub(crate) async fn run_collect(
    config: &AppConfig,
    dir: &Path,
    placement: CapturePlacement,
    mode: CollectMode,
    pages: Option<u32>,
    export: bool,
) -> anyhow::Result<()> {
    let (collector, mut statuses) = build_collector(config, dir, placement)?;
    let mut run = collector.start(mode, pages)?;

    let mut terminal: Option<CollectStatus> = None;
    loop {
        tokio::select! {
            Some(status) = statuses.recv() => {
                print_status(&status);
                if status.finished {
                    terminal = Some(status);
                }
            }
            joined = &mut run => {
                joined?;
                break;
            }
        }
    }
    while let Ok(status) = statuses.try_recv() {
        print_status(&status);
        if status.finished {
            terminal = Some(status);
        }
    }

    if let Some(CollectStatus {
        error: Some(error), ..
    }) = terminal
    {
        anyhow::bail!("collection failed: {error}");
    }

    if export {
        let path = collector.export()?;
        println!("exported {} shops to {}", collector.records().len(), path.display());
    }
    Ok(())
}

fn print_status(status: &CollectStatus) {
    match (&status.error, status.finished) {
        (Some(error), _) => println!("collection failed: {error}"),
        (None, true) => println!("collection complete: {} shops", status.count),
        (None, false) => println!(
            "page {}/{}: {} shops so far",
            status.current_page, status.total_pages, status.count
        ),
    }
}
