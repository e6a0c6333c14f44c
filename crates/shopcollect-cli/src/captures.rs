//! Loading captured ranking pages and wiring them to a collector.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use shopcollect_core::{AppConfig, CollectStatus};
use shopcollect_scraper::{
    CapturePlacement, Collector, CollectorSettings, DirectoryDownloader, SnapshotPage,
};
use tokio::sync::mpsc;

/// Reads every `*.html` file in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read, holds no captures, or
/// a capture cannot be read as UTF-8.
pub(crate) fn load_captures(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read capture directory {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("no .html captures found in {}", dir.display());
    }

    paths
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read capture {}", path.display()))
        })
        .collect()
}

/// Builds a collector over the captures in `dir`, returning the status stream.
pub(crate) fn build_collector(
    config: &AppConfig,
    dir: &Path,
    placement: CapturePlacement,
) -> anyhow::Result<(Collector<SnapshotPage>, mpsc::UnboundedReceiver<CollectStatus>)> {
    let captures = load_captures(dir)?;
    tracing::info!(captures = captures.len(), dir = %dir.display(), "captures loaded");

    let page = SnapshotPage::paged(
        captures,
        placement,
        Duration::from_millis(config.render_delay_ms),
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let collector = Collector::new(
        page,
        tx,
        DirectoryDownloader::new(config.export_dir.clone()),
        CollectorSettings::from_app_config(config),
    )
    .context("failed to build collector")?;
    Ok((collector, rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_html_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page-02.html"), "two").unwrap();
        std::fs::write(dir.path().join("page-01.HTML"), "one").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        let captures = load_captures(dir.path()).unwrap();
        assert_eq!(captures, ["one", "two"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_captures(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no .html captures"), "got: {err}");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_captures(&dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("failed to read capture directory"));
    }
}
