//! Capture fixtures shared by the subcommand tests.

use std::path::PathBuf;

use shopcollect_core::AppConfig;

pub(crate) fn ranking_page(prefix: &str, rows: usize, next_enabled: bool) -> String {
    let next_class = if next_enabled {
        "btn-next"
    } else {
        "btn-next is-disabled"
    };
    let body: String = (1..=rows)
        .map(|i| {
            format!(
                r#"<tr class="el-table__row">
                    <td><div class="cell">{i}</div></td>
                    <td><div class="cell"><img src="a.png"></div></td>
                    <td><div class="cell"><div class="src-css-product-storeTit-39uz">{prefix}-{i}</div></div></td>
                    <td><div class="cell"><div style="display: inline-block">{i}00</div><div class="weekly_data">↑5</div></div></td>
                    <td><div class="cell"><div style="display: inline-block">40</div><div class="weekly_data">2</div></div></td>
                    <td><div class="cell"><div>4.9</div></div></td>
                    <td><div class="cell"><div>12</div></div></td>
                    <td><div class="cell"><div>2020-01-01</div></div></td>
                    <td><div class="cell"><div>US</div></div></td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
            <div class="el-table__body-wrapper"><table class="el-table__body"><tbody>{body}</tbody></table></div>
            <button class="{next_class}">›</button>
        </body></html>"#
    )
}

/// Writes `captures` as `page-01.html`, `page-02.html`, ... into a temp dir.
pub(crate) fn capture_dir(captures: &[String]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (i, markup) in captures.iter().enumerate() {
        std::fs::write(dir.path().join(format!("page-{:02}.html", i + 1)), markup).unwrap();
    }
    dir
}

pub(crate) fn test_config(export_dir: PathBuf) -> AppConfig {
    AppConfig {
        locate_timeout_ms: 300,
        next_control_timeout_ms: 100,
        settle_delay_ms: 10,
        render_delay_ms: 0,
        export_dir,
        ..AppConfig::default()
    }
}
