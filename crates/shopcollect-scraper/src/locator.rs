//! Waits for a selector to appear in a page or any readable embedded document.
//!
//! Lookup is two-tier: the primary document first, then each embedded
//! document in order. Embedded documents that refuse access are skipped. If
//! nothing matches, the locator subscribes to the page's mutation feed and
//! repeats the lookup on every notification until it matches or the timeout
//! elapses. The subscription is dropped on every exit path.

use std::time::Duration;

use scraper::Selector;
use tokio::time::Instant;

use crate::dom::{parse_selector, Element, Page, SourceKind};
use crate::error::ScraperError;

/// An element together with the kind of document it was found in.
#[derive(Debug, Clone)]
pub struct Located {
    pub element: Element,
    pub source: SourceKind,
}

/// Runs the two-tier lookup once, without waiting.
pub fn find_now<P: Page + ?Sized>(page: &P, selector: &Selector) -> Option<Located> {
    for source in page.sources() {
        match source.query(selector) {
            Ok(Some(element)) => {
                return Some(Located {
                    element,
                    source: source.kind(),
                })
            }
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "skipping unreadable document"),
        }
    }
    None
}

/// Waits up to `timeout` for `selector` to match.
///
/// # Errors
///
/// - [`ScraperError::InvalidSelector`]: `selector` is not valid CSS.
/// - [`ScraperError::LocateTimeout`]: nothing matched before the deadline.
pub async fn locate<P: Page + ?Sized>(
    page: &P,
    selector: &str,
    timeout: Duration,
) -> Result<Located, ScraperError> {
    let parsed = parse_selector(selector)?;
    if let Some(found) = find_now(page, &parsed) {
        return Ok(found);
    }

    let deadline = Instant::now() + timeout;
    let mut subscription = page.subscribe();
    tracing::trace!(selector, "waiting for element");

    loop {
        match tokio::time::timeout_at(deadline, subscription.changed()).await {
            Ok(true) => {
                if let Some(found) = find_now(page, &parsed) {
                    tracing::debug!(selector, source = %found.source, "element appeared");
                    return Ok(found);
                }
            }
            Ok(false) => {
                // Feed closed: nothing can change any more, but the caller
                // still gets the full bounded wait.
                tokio::time::sleep_until(deadline).await;
                break;
            }
            Err(_elapsed) => break,
        }
    }

    Err(ScraperError::LocateTimeout {
        selector: selector.to_owned(),
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    })
}
