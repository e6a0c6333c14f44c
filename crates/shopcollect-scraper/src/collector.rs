//! The collection state machine.
//!
//! ```text
//! Idle ──start──▶ Collecting ──┬──▶ Completed
//!   ▲                          └──▶ Failed
//!   └──────────── start (new run) ───┘
//! ```
//!
//! A collector owns exactly one run state. `start` is rejected while a run is
//! collecting; it is never queued. The page loop runs on the current
//! `LocalSet` and reports through the [`StatusReporter`]. Rows gathered during
//! a run are promoted to the durable buffer only when the loop ends without
//! error; a failed run reports whatever the durable buffer already held.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::Utc;
use shopcollect_core::{Ack, CollectMode, Command, ShopRecord};
use tokio::task::JoinHandle;

use crate::csv;
use crate::dom::Page;
use crate::download::Downloader;
use crate::error::ScraperError;
use crate::extract::RowExtractor;
use crate::pagination::{CollectorSettings, PaginationDriver};
use crate::reporter::{StatusReporter, StatusSink};
use crate::run::{CollectionRun, RunPhase, RunSnapshot};

pub struct Collector<P> {
    inner: Rc<Inner<P>>,
}

impl<P> Clone for Collector<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<P> {
    page: P,
    run: RefCell<CollectionRun>,
    reporter: StatusReporter,
    extractor: RowExtractor,
    downloader: Box<dyn Downloader>,
    settings: CollectorSettings,
}

impl<P: Page + 'static> Collector<P> {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if the table selectors fail
    /// to compile.
    pub fn new(
        page: P,
        sink: impl StatusSink + 'static,
        downloader: impl Downloader + 'static,
        settings: CollectorSettings,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            inner: Rc::new(Inner {
                page,
                run: RefCell::new(CollectionRun::default()),
                reporter: StatusReporter::new(sink),
                extractor: RowExtractor::new()?,
                downloader: Box::new(downloader),
                settings,
            }),
        })
    }

    /// Dispatches one inbound command and returns its acknowledgment.
    ///
    /// A started run continues in the background after this returns. Export
    /// is refused (`received: false`) only when there is nothing to export.
    pub fn handle(&self, command: Command) -> Ack {
        match command {
            Command::StartCollect { mode, page_count } => match self.start(mode, page_count) {
                Ok(_detached) => Ack::ok(),
                Err(e) => Ack::rejected(e.to_string()),
            },
            Command::ExportData => match self.export() {
                Ok(_path) => Ack::ok(),
                Err(e @ ScraperError::NoDataToExport) => Ack::refused(e.to_string()),
                Err(e) => Ack::rejected(e.to_string()),
            },
        }
    }

    /// Begins a new run and spawns its page loop on the current `LocalSet`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Busy`] if a run is already collecting; the
    /// in-flight run is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`.
    pub fn start(
        &self,
        mode: CollectMode,
        page_count: Option<u32>,
    ) -> Result<JoinHandle<()>, ScraperError> {
        {
            let mut run = self.inner.run.borrow_mut();
            if run.is_collecting {
                tracing::warn!(
                    page = run.current_page,
                    target = run.target_pages,
                    "start rejected: collection already in progress"
                );
                return Err(ScraperError::Busy);
            }
            run.begin(mode.target_pages(page_count));
            tracing::info!(%mode, target = run.target_pages, "collection started");
        }

        let inner = Rc::clone(&self.inner);
        Ok(tokio::task::spawn_local(async move {
            inner.collect().await;
        }))
    }

    /// Serializes the durable buffer and hands it to the downloader.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NoDataToExport`]: the buffer is empty; nothing is written.
    /// - [`ScraperError::Download`]: the downloader could not store the file.
    pub fn export(&self) -> Result<PathBuf, ScraperError> {
        let payload = {
            let run = self.inner.run.borrow();
            csv::serialize(&run.records)
        };
        let Some(payload) = payload else {
            tracing::warn!("export rejected: no data to export");
            return Err(ScraperError::NoDataToExport);
        };
        let filename = csv::export_filename(Utc::now());
        self.inner.downloader.download(&filename, &payload)
    }

    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        self.inner.run.borrow().snapshot()
    }

    /// Copy of the durable record buffer.
    #[must_use]
    pub fn records(&self) -> Vec<ShopRecord> {
        self.inner.run.borrow().records.clone()
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.inner.page
    }
}

impl<P: Page> Inner<P> {
    async fn collect(&self) {
        let driver = PaginationDriver::new(&self.page, &self.extractor, self.settings);
        let outcome = driver.run(&self.run, &self.reporter).await;

        let phase = match outcome {
            Ok(Some(records)) => {
                let count = records.len();
                self.run.borrow_mut().records = records;
                self.reporter.report(&self.run, count, true, None);
                tracing::info!(count, "collection completed");
                RunPhase::Completed
            }
            Ok(None) => RunPhase::Completed,
            Err(e) => {
                tracing::error!(error = %e, "collection failed");
                let (latched, durable) = {
                    let run = self.run.borrow();
                    (run.is_completed, run.records.len())
                };
                if !latched {
                    self.reporter
                        .report(&self.run, durable, true, Some(e.to_string()));
                }
                RunPhase::Failed
            }
        };

        self.run.borrow_mut().finish(phase);
    }
}
