//! Line-delimited JSON session over stdio.
//!
//! Each stdin line is one [`Command`]; each is answered by one [`Ack`] line.
//! `collectStatus` events are written as they are reported. On end of input
//! the session waits for the last started run to finish before exiting.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use serde::Serialize;
use shopcollect_core::{Ack, AppConfig, CollectStatus, Command};
use shopcollect_scraper::{CapturePlacement, Collector, Page};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::captures::build_collector;

pub(crate) async fn run_session(
    config: &AppConfig,
    dir: &Path,
    placement: CapturePlacement,
) -> anyhow::Result<()> {
    let (collector, statuses) = build_collector(config, dir, placement)?;
    let stdin = BufReader::new(tokio::io::stdin());
    serve(
        collector,
        statuses,
        stdin,
        Rc::new(RefCell::new(std::io::stdout())),
    )
    .await
}

/// Answers commands read from `input` until it is exhausted, writing acks
/// and forwarded status events to `output`.
pub(crate) async fn serve<P, R, W>(
    collector: Collector<P>,
    mut statuses: mpsc::UnboundedReceiver<CollectStatus>,
    input: R,
    output: Rc<RefCell<W>>,
) -> anyhow::Result<()>
where
    P: Page + 'static,
    R: AsyncBufRead + Unpin,
    W: Write + 'static,
{
    let status_out = Rc::clone(&output);
    let forwarder = tokio::task::spawn_local(async move {
        while let Some(status) = statuses.recv().await {
            if let Err(e) = emit(&status_out, &status) {
                tracing::warn!(error = %e, "failed to write status event");
            }
        }
    });

    let mut last_run = None;
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let ack = match serde_json::from_str::<Command>(line) {
            Ok(Command::StartCollect { mode, page_count }) => {
                match collector.start(mode, page_count) {
                    Ok(run) => {
                        last_run = Some(run);
                        Ack::ok()
                    }
                    Err(e) => Ack::rejected(e.to_string()),
                }
            }
            Ok(command) => {
                tracing::debug!(?command, "command received");
                collector.handle(command)
            }
            Err(e) => Ack::refused(format!("invalid command: {e}")),
        };
        emit(&output, &ack)?;
    }

    if let Some(run) = last_run {
        run.await?;
    }
    drop(collector);
    forwarder.await?;
    Ok(())
}

fn emit<W: Write, T: Serialize>(output: &RefCell<W>, message: &T) -> anyhow::Result<()> {
    let mut out = output.borrow_mut();
    serde_json::to_writer(&mut *out, message)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_dir, ranking_page, test_config};
    use serde_json::Value;

    fn lines_of(output: &RefCell<Vec<u8>>) -> Vec<Value> {
        String::from_utf8(output.borrow().clone())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    async fn run_lines(input: &str, captures: &[String]) -> (Vec<Value>, tempfile::TempDir) {
        let caps = capture_dir(captures);
        let config = test_config(caps.path().join("exports"));
        let (collector, statuses) =
            build_collector(&config, caps.path(), CapturePlacement::Embedded).unwrap();
        let output = Rc::new(RefCell::new(Vec::new()));
        tokio::task::LocalSet::new()
            .run_until(serve(collector, statuses, input.as_bytes(), Rc::clone(&output)))
            .await
            .unwrap();
        let lines = lines_of(&output);
        (lines, caps)
    }

    #[tokio::test]
    async fn end_of_input_waits_for_the_run_and_forwards_every_status() {
        let input = concat!(
            r#"{"action":"startCollect","mode":"multi","pageCount":2}"#,
            "\n\nnot json\n",
        );
        let (lines, _caps) =
            run_lines(input, &[ranking_page("a", 2, true), ranking_page("b", 3, false)]).await;

        assert_eq!(lines[0], serde_json::json!({ "received": true }));
        assert_eq!(lines[1]["received"], false);
        assert!(lines[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid command"));

        let statuses: Vec<&Value> = lines[2..].iter().collect();
        assert_eq!(statuses.len(), 3);
        assert!(statuses.iter().all(|s| s["type"] == "collectStatus"));
        assert_eq!(statuses[0]["count"], 2);
        assert_eq!(statuses[1]["count"], 5);
        let terminal = statuses[2];
        assert_eq!(terminal["finished"], true);
        assert_eq!(terminal["count"], 5);
        assert_eq!(terminal["currentPage"], 2);
        assert_eq!(terminal["totalPages"], 2);
    }

    #[tokio::test]
    async fn export_before_any_run_is_refused() {
        let (lines, caps) = run_lines(
            "{\"action\":\"exportData\"}\n",
            &[ranking_page("a", 1, false)],
        )
        .await;
        assert_eq!(
            lines,
            vec![serde_json::json!({ "received": false, "error": "no data to export" })]
        );
        assert!(!caps.path().join("exports").exists());
    }
}
