//! Progress and terminal status delivery.

use std::cell::RefCell;

use shopcollect_core::CollectStatus;
use tokio::sync::mpsc;

use crate::run::CollectionRun;

/// Outbound half of the message transport. Delivery is fire-and-forget.
pub trait StatusSink {
    fn deliver(&self, status: CollectStatus);
}

impl StatusSink for mpsc::UnboundedSender<CollectStatus> {
    fn deliver(&self, status: CollectStatus) {
        if self.send(status).is_err() {
            tracing::debug!("status receiver dropped; discarding status");
        }
    }
}

/// Sends run status through a [`StatusSink`], honoring the terminal latch.
pub struct StatusReporter {
    sink: Box<dyn StatusSink>,
}

impl StatusReporter {
    pub fn new(sink: impl StatusSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Reports `count` records for the current run.
    ///
    /// Does nothing once the run has latched. A successful finish
    /// (`finished` with no `error`) sets the latch before sending.
    pub(crate) fn report(
        &self,
        run: &RefCell<CollectionRun>,
        count: usize,
        finished: bool,
        error: Option<String>,
    ) {
        let status = {
            let mut run = run.borrow_mut();
            if run.is_completed {
                tracing::trace!("run already reported finished; status suppressed");
                return;
            }
            if finished && error.is_none() {
                run.is_completed = true;
            }
            CollectStatus {
                count,
                finished,
                error,
                current_page: run.current_page,
                total_pages: run.target_pages,
            }
        };
        tracing::debug!(
            count = status.count,
            finished = status.finished,
            page = status.current_page,
            "reporting status"
        );
        self.sink.deliver(status);
    }
}
