pub mod collector;
pub mod csv;
pub mod dom;
pub mod download;
pub mod error;
pub mod extract;
pub mod locator;
pub mod pagination;
pub mod reporter;
pub mod run;

pub use collector::Collector;
pub use dom::{CapturePlacement, Document, DocumentSource, Element, Page, SnapshotPage, SourceKind};
pub use download::{DirectoryDownloader, Downloader};
pub use error::ScraperError;
pub use extract::RowExtractor;
pub use pagination::CollectorSettings;
pub use reporter::{StatusReporter, StatusSink};
pub use run::{RunPhase, RunSnapshot};
