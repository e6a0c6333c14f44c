//! Wire shapes exchanged with the popup over the extension message channel.
//!
//! ## Inbound
//! ```text
//! {"action":"startCollect","mode":"multi","pageCount":3}
//! {"action":"exportData"}
//! ```
//!
//! ## Outbound
//! ```text
//! {"type":"collectStatus","count":9,"finished":true,"error":null,"currentPage":2,"totalPages":3}
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectMode {
    /// Only the page currently shown.
    #[default]
    Single,
    /// Walk forward through up to `pageCount` pages.
    Multi,
}

impl CollectMode {
    /// Number of pages a run in this mode should target.
    ///
    /// `Single` always targets one page; `Multi` clamps to at least one.
    #[must_use]
    pub fn target_pages(self, page_count: Option<u32>) -> u32 {
        match self {
            CollectMode::Single => 1,
            CollectMode::Multi => page_count.unwrap_or(1).max(1),
        }
    }
}

impl std::fmt::Display for CollectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectMode::Single => write!(f, "single"),
            CollectMode::Multi => write!(f, "multi"),
        }
    }
}

/// A command sent to the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    StartCollect {
        #[serde(default)]
        mode: CollectMode,
        #[serde(default)]
        page_count: Option<u32>,
    },
    ExportData,
}

/// Synchronous acknowledgment returned for every [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            received: true,
            error: None,
        }
    }

    /// The command was accepted by the listener but refused.
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            received: true,
            error: Some(error.into()),
        }
    }

    /// The command could not be acted on at all.
    #[must_use]
    pub fn refused(error: impl Into<String>) -> Self {
        Self {
            received: false,
            error: Some(error.into()),
        }
    }
}

/// Progress or terminal status of the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "collectStatus", rename_all = "camelCase")]
pub struct CollectStatus {
    pub count: usize,
    pub finished: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
}
