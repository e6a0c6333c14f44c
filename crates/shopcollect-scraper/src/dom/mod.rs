//! Read-only view over rendered documents.
//!
//! A [`Page`] exposes its primary document plus any embedded documents
//! (iframes) as an ordered list of [`DocumentSource`]s. Embedded documents
//! may be unreadable because of an origin boundary; callers query each
//! source independently and skip the ones that refuse access.
//!
//! [`Element`] is an owned handle into a parsed document: it keeps the
//! document alive through an `Rc`, so it survives later re-renders of the
//! page and never borrows from it.

mod observer;
mod snapshot;

use std::fmt;
use std::rc::Rc;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

pub use observer::{MutationFeed, MutationSubscription};
pub use snapshot::{CapturePlacement, SnapshotPage};

/// Parses a CSS selector, mapping failures to [`ScraperError::InvalidSelector`].
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] when `selector` is not valid CSS.
pub fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

/// An element inside a parsed [`Document`].
#[derive(Clone)]
pub struct Element {
    doc: Rc<Html>,
    id: NodeId,
}

impl Element {
    fn new(doc: &Rc<Html>, element: ElementRef<'_>) -> Self {
        Self {
            doc: Rc::clone(doc),
            id: element.id(),
        }
    }

    fn with_ref<R>(&self, f: impl FnOnce(ElementRef<'_>) -> R) -> Option<R> {
        self.doc.tree.get(self.id).and_then(ElementRef::wrap).map(f)
    }

    /// First descendant matching `selector`.
    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<Element> {
        self.with_ref(|el| el.select(selector).next().map(|m| Element::new(&self.doc, m)))
            .flatten()
    }

    /// All descendants matching `selector`, in document order.
    #[must_use]
    pub fn select_all(&self, selector: &Selector) -> Vec<Element> {
        self.with_ref(|el| {
            el.select(selector)
                .map(|m| Element::new(&self.doc, m))
                .collect()
        })
        .unwrap_or_default()
    }

    /// Concatenated text of all descendant text nodes, untrimmed.
    #[must_use]
    pub fn text(&self) -> String {
        self.with_ref(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tag_name(&self) -> String {
        self.with_ref(|el| el.value().name().to_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.with_ref(|el| el.value().classes().any(|c| c == class))
            .unwrap_or(false)
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.with_ref(|el| el.value().attr(name).map(str::to_owned))
            .flatten()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag_name())
            .field("class", &self.attr("class"))
            .finish()
    }
}

/// A fully parsed HTML document.
#[derive(Clone)]
pub struct Document {
    html: Rc<Html>,
}

impl Document {
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Rc::new(Html::parse_document(markup)),
        }
    }

    #[must_use]
    pub fn query(&self, selector: &Selector) -> Option<Element> {
        self.html
            .select(selector)
            .next()
            .map(|el| Element::new(&self.html, el))
    }

    #[must_use]
    pub fn query_all(&self, selector: &Selector) -> Vec<Element> {
        self.html
            .select(selector)
            .map(|el| Element::new(&self.html, el))
            .collect()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Primary,
    Embedded,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Primary => write!(f, "primary"),
            SourceKind::Embedded => write!(f, "embedded"),
        }
    }
}

/// A nested browsing context. `content` is `None` when its origin forbids
/// reading the document.
#[derive(Debug, Clone)]
pub struct EmbeddedDocument {
    pub src: String,
    content: Option<Document>,
}

impl EmbeddedDocument {
    #[must_use]
    pub fn readable(src: impl Into<String>, document: Document) -> Self {
        Self {
            src: src.into(),
            content: Some(document),
        }
    }

    #[must_use]
    pub fn cross_origin(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            content: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::EmbeddedDocumentAccess`] for a cross-origin frame.
    pub fn document(&self) -> Result<&Document, ScraperError> {
        self.content
            .as_ref()
            .ok_or_else(|| ScraperError::EmbeddedDocumentAccess {
                src: self.src.clone(),
                reason: "blocked by cross-origin policy".to_owned(),
            })
    }
}

/// One place a selector can be looked up.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Primary(Document),
    Embedded(EmbeddedDocument),
}

impl DocumentSource {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            DocumentSource::Primary(_) => SourceKind::Primary,
            DocumentSource::Embedded(_) => SourceKind::Embedded,
        }
    }

    fn document(&self) -> Result<&Document, ScraperError> {
        match self {
            DocumentSource::Primary(doc) => Ok(doc),
            DocumentSource::Embedded(frame) => frame.document(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::EmbeddedDocumentAccess`] when the source is an
    /// unreadable embedded document.
    pub fn query(&self, selector: &Selector) -> Result<Option<Element>, ScraperError> {
        Ok(self.document()?.query(selector))
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::EmbeddedDocumentAccess`] when the source is an
    /// unreadable embedded document.
    pub fn query_all(&self, selector: &Selector) -> Result<Vec<Element>, ScraperError> {
        Ok(self.document()?.query_all(selector))
    }
}

/// A live page the collector reads from and navigates.
pub trait Page {
    /// Primary document first, then embedded documents in document order.
    fn sources(&self) -> Vec<DocumentSource>;

    /// Subscribes to DOM mutations anywhere under the primary body,
    /// including attribute changes. Dropping the subscription disconnects it.
    fn subscribe(&self) -> MutationSubscription;

    /// Activates `element` the way a user click would.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Navigation`] if the page cannot act on the click.
    fn click(&self, element: &Element) -> Result<(), ScraperError>;
}
