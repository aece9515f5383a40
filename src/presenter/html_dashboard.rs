//! Self-refreshing HTML dashboard

use super::backend::{Presenter, PresenterError};
use super::json_writer::write_atomic;
use crate::stream_core::Snapshot;
use crate::ui::renderer::{format_optional_time, format_pct, format_score, format_time};
use async_trait::async_trait;
use chrono::Utc;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

const TOP_KEYWORDS: usize = 8;
const RECENT_POINTS: usize = 10;

pub struct HtmlDashboard {
    path: PathBuf,
    refresh_secs: u64,
}

impl HtmlDashboard {
    pub fn new(path: PathBuf, refresh: Duration) -> Self {
        log::info!("📝 Writing dashboard to: {}", path.display());
        Self {
            path,
            refresh_secs: refresh.as_secs_f64().ceil().max(1.0) as u64,
        }
    }

    pub fn render_html(&self, snapshot: &Snapshot) -> String {
        let totals = &snapshot.totals;
        let rates = &snapshot.rates;

        let mut stats = String::new();
        for (class, value, label) in [
            ("total", totals.event_count.to_string(), "Total Messages".to_string()),
            (
                "significant",
                totals.significant_count.to_string(),
                format!("Significant ({})", format_pct(rates.significant_pct)),
            ),
            (
                "impact",
                totals.high_impact_count.to_string(),
                format!("High Impact ({})", format_pct(rates.high_impact_pct)),
            ),
            (
                "opportunity",
                totals.opportunity_count.to_string(),
                format!("Opportunities ({})", format_pct(rates.opportunity_pct)),
            ),
            ("authors", snapshot.contributor_count.to_string(), "Contributors".to_string()),
            ("skipped", totals.skipped_count.to_string(), "Skipped Records".to_string()),
        ] {
            let _ = write!(
                stats,
                r#"<div class="stat {class}"><span class="stat-number">{value}</span><span class="stat-label">{label}</span></div>"#
            );
        }

        let mut keywords = String::new();
        for tc in snapshot.top_keywords(TOP_KEYWORDS) {
            let _ = write!(
                keywords,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&tc.term),
                tc.count
            );
        }

        let mut categories = String::new();
        for tc in &snapshot.category_counts {
            let _ = write!(
                categories,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&tc.term),
                tc.count
            );
        }

        let mut recent = String::new();
        let skip = snapshot.content_series.len().saturating_sub(RECENT_POINTS);
        for (content, impact) in snapshot
            .content_series
            .iter()
            .zip(snapshot.impact_series.iter())
            .skip(skip)
            .rev()
        {
            let _ = write!(
                recent,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                format_time(content.timestamp),
                format_score(content.value),
                format_score(impact.value)
            );
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<title>Lexiflow Dashboard</title>
<meta http-equiv="refresh" content="{refresh}">
<style>
body {{ font-family: 'Segoe UI', Arial, sans-serif; margin: 0; padding: 20px; background: #f4f6f8; color: #2c3e50; }}
.container {{ max-width: 1200px; margin: 0 auto; }}
.stats {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 16px; margin: 24px 0; }}
.stat {{ padding: 18px; border-radius: 10px; text-align: center; color: white; background: #34495e; }}
.stat.significant {{ background: #27ae60; }}
.stat.impact {{ background: #f39c12; }}
.stat.opportunity {{ background: #e74c3c; }}
.stat.authors {{ background: #8e44ad; }}
.stat.skipped {{ background: #7f8c8d; }}
.stat-number {{ font-size: 2.4em; display: block; }}
.tables {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 16px; }}
table {{ width: 100%; border-collapse: collapse; background: white; }}
th, td {{ padding: 6px 10px; border-bottom: 1px solid #ecf0f1; text-align: left; }}
.footer {{ color: #7f8c8d; margin-top: 24px; }}
</style>
</head>
<body>
<div class="container">
<h1>Message Analysis Dashboard</h1>
<div class="stats">{stats}</div>
<div class="tables">
<table><thead><tr><th>Keyword</th><th>Mentions</th></tr></thead><tbody>{keywords}</tbody></table>
<table><thead><tr><th>Category</th><th>Significant</th></tr></thead><tbody>{categories}</tbody></table>
<table><thead><tr><th>Time</th><th>Content</th><th>Impact</th></tr></thead><tbody>{recent}</tbody></table>
</div>
<div class="footer">Window: {len}/{capacity} | Last event: {last_event} | Last updated: {updated}</div>
</div>
</body>
</html>
"#,
            refresh = self.refresh_secs,
            len = snapshot.content_series.len(),
            capacity = snapshot.window_capacity,
            last_event = format_optional_time(snapshot.last_event_at),
            updated = Utc::now().format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[async_trait]
impl Presenter for HtmlDashboard {
    async fn render(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        let html = self.render_html(snapshot);
        write_atomic(&self.path, html.as_bytes())?;
        log::debug!("Dashboard updated: {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}
