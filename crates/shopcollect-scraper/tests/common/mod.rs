//! Captured-page fixtures shaped like the shop ranking table.

#![allow(dead_code)]

use std::time::Duration;

use shopcollect_core::CollectStatus;
use shopcollect_scraper::{
    CapturePlacement, Collector, CollectorSettings, DirectoryDownloader, SnapshotPage,
};
use tokio::sync::mpsc;

pub fn shop_row(name: &str, sales: &str) -> String {
    format!(
        r#"<tr class="el-table__row">
            <td><div class="cell">#</div></td>
            <td><div class="cell"><img src="avatar.png"></div></td>
            <td><div class="cell"><a><div class="src-css-product-storeTit-39uz">{name}</div></a></div></td>
            <td><div class="cell"><div style="display: inline-block">{sales}</div><div class="weekly_data">↑21</div></div></td>
            <td><div class="cell"><div style="display: inline-block">1,480</div><div class="weekly_data">↑3</div></div></td>
            <td><div class="cell"><div>4.8</div></div></td>
            <td><div class="cell"><div>126</div></div></td>
            <td><div class="cell"><div>2018-11-20</div></div></td>
            <td><div class="cell"><div>GB</div></div></td>
        </tr>"#
    )
}

/// One capture of the ranking page with the given rows.
pub fn ranking_page(rows: &[String], next_enabled: bool) -> String {
    let next_class = if next_enabled {
        "btn-next"
    } else {
        "btn-next is-disabled"
    };
    format!(
        r#"<html><body>
            <div class="el-table">
                <div class="el-table__header-wrapper"><table><thead><tr><th>Shop</th></tr></thead></table></div>
                <div class="el-table__body-wrapper"><table class="el-table__body"><tbody>{}</tbody></table></div>
            </div>
            <div class="el-pagination"><button class="btn-prev">‹</button><button class="{next_class}">›</button></div>
        </body></html>"#,
        rows.concat()
    )
}

/// A ranking page with `count` well-formed rows named `{prefix}-{i}`.
pub fn page_of(prefix: &str, count: usize, next_enabled: bool) -> String {
    let rows: Vec<String> = (1..=count)
        .map(|i| shop_row(&format!("{prefix}-{i}"), &format!("{}", i * 100)))
        .collect();
    ranking_page(&rows, next_enabled)
}

/// One capture whose pagination bar has no next control at all.
pub fn page_without_next(prefix: &str, count: usize) -> String {
    page_of(prefix, count, false).replace(r#"<button class="btn-next is-disabled">›</button>"#, "")
}

/// Body shown while the application is still fetching a page.
pub fn loading_page() -> String {
    r#"<html><body><div class="el-loading-mask">Loading</div></body></html>"#.to_owned()
}

pub fn fast_settings() -> CollectorSettings {
    CollectorSettings {
        locate_timeout: Duration::from_millis(300),
        next_control_timeout: Duration::from_millis(100),
        settle_delay: Duration::from_millis(40),
    }
}

pub struct Harness {
    pub collector: Collector<SnapshotPage>,
    pub statuses: mpsc::UnboundedReceiver<CollectStatus>,
    pub export_dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(captures: Vec<String>, placement: CapturePlacement, render_delay: Duration) -> Self {
        Self::over(SnapshotPage::paged(captures, placement, render_delay))
    }

    /// A harness around an already assembled page.
    pub fn over(page: SnapshotPage) -> Self {
        let (tx, statuses) = mpsc::unbounded_channel();
        let export_dir = tempfile::tempdir().expect("tempdir");
        let collector = Collector::new(
            page,
            tx,
            DirectoryDownloader::new(export_dir.path()),
            fast_settings(),
        )
        .expect("collector");
        Self {
            collector,
            statuses,
            export_dir,
        }
    }

    pub fn drain(&mut self) -> Vec<CollectStatus> {
        let mut out = Vec::new();
        while let Ok(status) = self.statuses.try_recv() {
            out.push(status);
        }
        out
    }
}
