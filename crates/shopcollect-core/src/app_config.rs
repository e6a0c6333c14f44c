use std::path::PathBuf;

/// Process-wide settings for one collector instance.
///
/// Every field has a default, so an empty environment yields a usable config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Bounded wait for the data table to render, in milliseconds.
    pub locate_timeout_ms: u64,
    /// Bounded wait for an enabled "next page" control, in milliseconds.
    pub next_control_timeout_ms: u64,
    /// Pause after triggering pagination before the next page is read.
    pub settle_delay_ms: u64,
    /// Replay backend only: how long a navigated capture takes to render.
    pub render_delay_ms: u64,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            locate_timeout_ms: 5_000,
            next_control_timeout_ms: 5_000,
            settle_delay_ms: 1_000,
            render_delay_ms: 250,
            export_dir: PathBuf::from("."),
        }
    }
}
