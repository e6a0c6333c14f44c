//! Page-by-page walk through the ranking table.
//!
//! Each iteration waits for the table, extracts its rows into a run-local
//! buffer, reports progress, then clicks the enabled "next" control and
//! pauses for the target application to navigate. A missing next control
//! ends the walk normally; any other failure ends it with an error and the
//! run-local buffer is discarded by the caller.

use std::cell::RefCell;
use std::time::Duration;

use shopcollect_core::{AppConfig, ShopRecord};

use crate::dom::Page;
use crate::error::ScraperError;
use crate::extract::{RowExtractor, TABLE_READY};
use crate::locator;
use crate::reporter::StatusReporter;
use crate::run::CollectionRun;

/// Matches the pagination "next" button only while it is enabled.
pub const NEXT_CONTROL: &str = ".btn-next:not(.is-disabled)";

/// Timing knobs for a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Bounded wait for the table to render on each page.
    pub locate_timeout: Duration,
    /// Bounded wait for an enabled next control before stopping early.
    pub next_control_timeout: Duration,
    /// Pause after clicking next before reading the following page.
    pub settle_delay: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            locate_timeout: Duration::from_secs(5),
            next_control_timeout: Duration::from_secs(5),
            settle_delay: Duration::from_secs(1),
        }
    }
}

impl CollectorSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            locate_timeout: Duration::from_millis(config.locate_timeout_ms),
            next_control_timeout: Duration::from_millis(config.next_control_timeout_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }
}

pub(crate) struct PaginationDriver<'a, P: ?Sized> {
    page: &'a P,
    extractor: &'a RowExtractor,
    settings: CollectorSettings,
}

impl<'a, P: Page + ?Sized> PaginationDriver<'a, P> {
    pub fn new(page: &'a P, extractor: &'a RowExtractor, settings: CollectorSettings) -> Self {
        Self {
            page,
            extractor,
            settings,
        }
    }

    /// Walks pages until the target count is reached or no next control
    /// remains. Returns the rows gathered this run, or `None` if the run had
    /// already latched as completed.
    pub async fn run(
        &self,
        run: &RefCell<CollectionRun>,
        reporter: &StatusReporter,
    ) -> Result<Option<Vec<ShopRecord>>, ScraperError> {
        let mut collected: Vec<ShopRecord> = Vec::new();

        loop {
            let (page_no, target) = {
                let run = run.borrow();
                if run.is_completed {
                    return Ok(None);
                }
                (run.current_page, run.target_pages)
            };
            if page_no > target {
                break;
            }

            if let Err(e) =
                locator::locate(self.page, TABLE_READY, self.settings.locate_timeout).await
            {
                return Err(self.table_wait_error(e));
            }

            let rows = match self.extractor.find_table(self.page)? {
                Some(table) => self.extractor.extract_page(&table),
                None => Vec::new(),
            };
            if rows.is_empty() {
                return Err(ScraperError::EmptyPage { page: page_no });
            }

            tracing::info!(page = page_no, target, rows = rows.len(), "page collected");
            collected.extend(rows);
            reporter.report(run, collected.len(), false, None);

            if page_no >= target {
                break;
            }

            let next = match locator::locate(
                self.page,
                NEXT_CONTROL,
                self.settings.next_control_timeout,
            )
            .await
            {
                Ok(found) => found,
                Err(ScraperError::LocateTimeout { .. }) => {
                    tracing::info!(page = page_no, target, "no enabled next control; stopping early");
                    break;
                }
                Err(e) => return Err(e),
            };

            self.page.click(&next.element)?;
            run.borrow_mut().current_page += 1;
            tokio::time::sleep(self.settings.settle_delay).await;
        }

        Ok(Some(collected))
    }

    /// A table wait that timed out while an embedded document refused access
    /// is reported as the access failure.
    fn table_wait_error(&self, err: ScraperError) -> ScraperError {
        if !matches!(err, ScraperError::LocateTimeout { .. }) {
            return err;
        }
        match self.extractor.find_table(self.page) {
            Err(access @ ScraperError::EmbeddedDocumentAccess { .. }) => access,
            _ => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_app_config() {
        let config = AppConfig {
            locate_timeout_ms: 1_200,
            next_control_timeout_ms: 300,
            settle_delay_ms: 0,
            ..AppConfig::default()
        };
        assert_eq!(
            CollectorSettings::from_app_config(&config),
            CollectorSettings {
                locate_timeout: Duration::from_millis(1_200),
                next_control_timeout: Duration::from_millis(300),
                settle_delay: Duration::ZERO,
            }
        );
    }

    #[test]
    fn default_settings_match_default_config() {
        assert_eq!(
            CollectorSettings::from_app_config(&AppConfig::default()),
            CollectorSettings::default()
        );
    }
}
