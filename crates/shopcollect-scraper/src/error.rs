use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("collection already in progress")]
    Busy,

    #[error("no data to export")]
    NoDataToExport,

    #[error("timeout waiting for element `{selector}` after {timeout_ms}ms")]
    LocateTimeout { selector: String, timeout_ms: u64 },

    #[error("no data found on page {page}")]
    EmptyPage { page: u32 },

    #[error("cannot access embedded document {src}: {reason}")]
    EmbeddedDocumentAccess { src: String, reason: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("failed to write export {path}: {source}")]
    Download {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
