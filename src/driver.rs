//! Driver loop: poll the stream, score and aggregate each event, present
//! snapshots on a fixed cadence.
//!
//! Everything runs on a single task. The aggregator is owned by the driver,
//! and each event is fully scored before the aggregator is mutated.

use crate::presenter::Presenter;
use crate::stream_core::{
    Event, EventError, EventScorer, ExponentialBackoff, PollOutcome, RollingAggregator, Snapshot,
    StreamReader,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub poll_interval: Duration,
    pub render_interval: Duration,
    pub backoff_initial: Duration,
    pub backoff_max: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            render_interval: Duration::from_secs(3),
            backoff_initial: Duration::from_secs(1),
            backoff_max: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Shutdown,
    PresenterRequested,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stop_reason: StopReason,
    pub snapshot: Snapshot,
    pub renders: u64,
    pub render_failures: u64,
    pub stream_errors: u64,
}

pub struct Driver<R, P> {
    reader: R,
    presenter: P,
    scorer: EventScorer,
    aggregator: RollingAggregator,
    config: DriverConfig,
    backoff: ExponentialBackoff,
    renders: u64,
    render_failures: u64,
    stream_errors: u64,
}

impl<R: StreamReader, P: Presenter> Driver<R, P> {
    pub fn new(
        reader: R,
        presenter: P,
        scorer: EventScorer,
        aggregator: RollingAggregator,
        config: DriverConfig,
    ) -> Self {
        let backoff = ExponentialBackoff::new(config.backoff_initial, config.backoff_max);
        Self {
            reader,
            presenter,
            scorer,
            aggregator,
            config,
            backoff,
            renders: 0,
            render_failures: 0,
            stream_errors: 0,
        }
    }

    pub fn aggregator(&self) -> &RollingAggregator {
        &self.aggregator
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Score and aggregate one record, or count it as skipped.
    pub fn process_record(&mut self, record: Result<Event, EventError>) {
        match record {
            Ok(event) => {
                let result = self.scorer.score(&event);
                self.aggregator.update(&event, &result);

                log::debug!(
                    "Message #{} - content: {:.2}, impact: {:.2}, author: {}",
                    self.aggregator.totals().event_count,
                    result.content_score,
                    result.impact_score,
                    event.author
                );
                if self.scorer.detector().is_strong(result.content_score) {
                    log::info!(
                        "🎯 Strong message from {} (content: {:.2}, terms: {})",
                        event.author,
                        result.content_score,
                        result.matched_terms.join(", ")
                    );
                }
                if result.is_opportunity {
                    log::info!("🙋 Opportunity from {}", event.author);
                }
            }
            Err(e) => {
                self.aggregator.record_skipped();
                log::warn!("⚠️  Skipping record: {}", e);
            }
        }
    }

    /// Hand a snapshot to the presenter. A failing or slow presenter is
    /// logged and otherwise ignored.
    pub async fn present(&mut self) {
        let snapshot = self.aggregator.snapshot();
        match timeout(self.config.render_interval, self.presenter.render(&snapshot)).await {
            Ok(Ok(())) => {
                self.renders += 1;
            }
            Ok(Err(e)) => {
                self.render_failures += 1;
                log::error!("❌ {} presenter failed: {}", self.presenter.name(), e);
            }
            Err(_) => {
                self.render_failures += 1;
                log::warn!(
                    "⏱️  {} presenter exceeded {:.1}s, skipping frame",
                    self.presenter.name(),
                    self.config.render_interval.as_secs_f64()
                );
            }
        }
    }

    /// Run until the stream ends, the presenter asks to stop, or `shutdown`
    /// resolves. Shutdown is observed between events, never mid-update.
    pub async fn run_until<F>(mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        log::info!("✅ Driver running - reading {}", self.reader.describe());

        let mut last_render = Instant::now();

        let stop_reason = 'run: loop {
            let polled = tokio::select! {
                biased;
                _ = &mut shutdown => break 'run StopReason::Shutdown,
                polled = self.reader.poll() => polled,
            };

            let wait = match polled {
                Ok(PollOutcome::Records(records)) => {
                    self.backoff.reset();
                    for record in records {
                        self.process_record(record);
                    }
                    self.config.poll_interval
                }
                Ok(PollOutcome::EndOfStream) => {
                    log::info!("🏁 End of stream reached");
                    self.present().await;
                    break 'run StopReason::EndOfStream;
                }
                Err(e) => {
                    self.stream_errors += 1;
                    log::warn!("Stream error: {}", e);
                    self.backoff.next_delay()
                }
            };

            if last_render.elapsed() >= self.config.render_interval {
                self.present().await;
                last_render = Instant::now();
                if self.presenter.wants_shutdown() {
                    break 'run StopReason::PresenterRequested;
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break 'run StopReason::Shutdown,
                _ = sleep(wait) => {}
            }
        };

        let snapshot = self.aggregator.snapshot();
        log::info!(
            "Driver stopped ({:?}): {} events, {} skipped, {} renders",
            stop_reason,
            snapshot.totals.event_count,
            snapshot.totals.skipped_count,
            self.renders
        );

        RunSummary {
            stop_reason,
            snapshot,
            renders: self.renders,
            render_failures: self.render_failures,
            stream_errors: self.stream_errors,
        }
    }
}
