//! In-memory [`Page`] backed by captured HTML.
//!
//! A paged snapshot holds an ordered list of captures of the ranking table,
//! one per result page. The first capture is rendered immediately; clicking
//! an element with the `btn-next` class renders the following capture after
//! `render_delay`, which mimics the target application re-rendering its
//! table asynchronously after navigation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::{Document, DocumentSource, Element, EmbeddedDocument, MutationFeed, MutationSubscription, Page};
use crate::error::ScraperError;

/// `src` of the iframe that hosts embedded captures.
pub const CAPTURE_FRAME_SRC: &str = "https://ranking.shopdata.example/shop-rank";

const NEXT_CLASS: &str = "btn-next";

/// Where captured pages are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePlacement {
    /// Directly in the primary document.
    Primary,
    /// Inside an iframe of the primary document.
    Embedded,
}

/// Cheaply cloneable handle to an in-memory page.
///
/// Navigation renders through `tokio::task::spawn_local`, so a paged
/// snapshot must be clicked from inside a `LocalSet`.
#[derive(Clone)]
pub struct SnapshotPage {
    inner: Rc<Inner>,
}

struct Inner {
    primary: RefCell<Document>,
    frames: RefCell<Vec<EmbeddedDocument>>,
    feed: MutationFeed,
    captures: Vec<String>,
    placement: CapturePlacement,
    cursor: Cell<usize>,
    render_delay: Duration,
    clicks: Cell<usize>,
}

impl SnapshotPage {
    /// A static page with no navigation.
    #[must_use]
    pub fn new(primary_markup: &str) -> Self {
        Self::build(
            Document::parse(primary_markup),
            Vec::new(),
            Vec::new(),
            CapturePlacement::Primary,
            Duration::ZERO,
        )
    }

    /// A page that walks through `captures` as the next control is clicked.
    #[must_use]
    pub fn paged(captures: Vec<String>, placement: CapturePlacement, render_delay: Duration) -> Self {
        let (primary, frames) = match (placement, captures.first()) {
            (CapturePlacement::Primary, Some(first)) => (Document::parse(first), Vec::new()),
            (CapturePlacement::Primary, None) => (Document::parse(""), Vec::new()),
            (CapturePlacement::Embedded, first) => (
                Document::parse(&frame_shell()),
                vec![EmbeddedDocument::readable(
                    CAPTURE_FRAME_SRC,
                    Document::parse(first.map_or("", String::as_str)),
                )],
            ),
        };
        Self::build(primary, frames, captures, placement, render_delay)
    }

    fn build(
        primary: Document,
        frames: Vec<EmbeddedDocument>,
        captures: Vec<String>,
        placement: CapturePlacement,
        render_delay: Duration,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                primary: RefCell::new(primary),
                frames: RefCell::new(frames),
                feed: MutationFeed::new(),
                captures,
                placement,
                cursor: Cell::new(0),
                render_delay,
                clicks: Cell::new(0),
            }),
        }
    }

    /// Replaces the primary document and notifies observers.
    pub fn set_primary(&self, markup: &str) {
        *self.inner.primary.borrow_mut() = Document::parse(markup);
        self.inner.feed.notify();
    }

    /// Appends an embedded document and notifies observers.
    pub fn push_frame(&self, frame: EmbeddedDocument) {
        self.inner.frames.borrow_mut().push(frame);
        self.inner.feed.notify();
    }

    /// Replaces the document of the frame whose `src` matches, if any.
    pub fn set_frame(&self, src: &str, markup: &str) {
        let mut replaced = false;
        for frame in self.inner.frames.borrow_mut().iter_mut() {
            if frame.src == src {
                *frame = EmbeddedDocument::readable(src, Document::parse(markup));
                replaced = true;
            }
        }
        if replaced {
            self.inner.feed.notify();
        }
    }

    /// 1-based index of the capture most recently navigated to.
    #[must_use]
    pub fn current_capture(&self) -> usize {
        self.inner.cursor.get() + 1
    }

    #[must_use]
    pub fn click_count(&self) -> usize {
        self.inner.clicks.get()
    }

    /// Number of mutation observers currently connected.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.feed.observer_count()
    }

    fn render_capture(&self, index: usize) {
        let Some(markup) = self.inner.captures.get(index) else {
            return;
        };
        match self.inner.placement {
            CapturePlacement::Primary => self.set_primary(markup),
            CapturePlacement::Embedded => self.set_frame(CAPTURE_FRAME_SRC, markup),
        }
        tracing::debug!(capture = index + 1, "snapshot rendered capture");
    }
}

impl Page for SnapshotPage {
    fn sources(&self) -> Vec<DocumentSource> {
        let mut sources = vec![DocumentSource::Primary(self.inner.primary.borrow().clone())];
        sources.extend(
            self.inner
                .frames
                .borrow()
                .iter()
                .cloned()
                .map(DocumentSource::Embedded),
        );
        sources
    }

    fn subscribe(&self) -> MutationSubscription {
        self.inner.feed.subscribe()
    }

    fn click(&self, element: &Element) -> Result<(), ScraperError> {
        self.inner.clicks.set(self.inner.clicks.get() + 1);
        if !element.has_class(NEXT_CLASS) {
            return Ok(());
        }
        if self.inner.captures.is_empty() {
            return Err(ScraperError::Navigation(
                "page has no captures to navigate to".to_owned(),
            ));
        }

        let next = self.inner.cursor.get() + 1;
        if next >= self.inner.captures.len() {
            tracing::debug!(capture = next, "next clicked on final capture; nothing to render");
            return Ok(());
        }
        self.inner.cursor.set(next);

        if self.inner.render_delay.is_zero() {
            self.render_capture(next);
        } else {
            let page = self.clone();
            let delay = self.inner.render_delay;
            tokio::task::spawn_local(async move {
                tokio::time::sleep(delay).await;
                page.render_capture(next);
            });
        }
        Ok(())
    }
}

fn frame_shell() -> String {
    format!(
        r#"<html><head><title>Shop Ranking</title></head><body><div id="app"><iframe src="{CAPTURE_FRAME_SRC}"></iframe></div></body></html>"#
    )
}
