use super::backend::{Presenter, PresenterError};
use crate::stream_core::Snapshot;
use crate::ui::renderer::{format_optional_time, format_pct, format_score};
use async_trait::async_trait;

/// Writes a one-line summary of each snapshot to the log.
pub struct LogPresenter {
    top_keywords: usize,
}

impl LogPresenter {
    pub fn new(top_keywords: usize) -> Self {
        Self { top_keywords }
    }

    pub fn summary_line(&self, snapshot: &Snapshot) -> String {
        let latest = snapshot
            .content_series
            .last()
            .zip(snapshot.impact_series.last())
            .map(|(c, i)| format!("{}/{}", format_score(c.value), format_score(i.value)))
            .unwrap_or_else(|| "-".to_string());

        let keywords = snapshot
            .top_keywords(self.top_keywords)
            .iter()
            .map(|tc| format!("{}={}", tc.term, tc.count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "events={} significant={} ({}) high_impact={} ({}) opportunities={} ({}) contributors={} skipped={} latest={} at {} top=[{}]",
            snapshot.totals.event_count,
            snapshot.totals.significant_count,
            format_pct(snapshot.rates.significant_pct),
            snapshot.totals.high_impact_count,
            format_pct(snapshot.rates.high_impact_pct),
            snapshot.totals.opportunity_count,
            format_pct(snapshot.rates.opportunity_pct),
            snapshot.contributor_count,
            snapshot.totals.skipped_count,
            latest,
            format_optional_time(snapshot.last_event_at),
            keywords,
        )
    }
}

impl Default for LogPresenter {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl Presenter for LogPresenter {
    async fn render(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        log::info!("📊 {}", self.summary_line(snapshot));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
