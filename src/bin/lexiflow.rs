//! Lexiflow Binary - Live Message Scoring and Aggregation
//!
//! Tails a JSONL message stream, scores each message against the lexicon and
//! presents rolling aggregates on a fixed cadence.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin lexiflow -- --presenter html
//! ```
//!
//! Presenters: `log` (default), `json`, `html`, `tui`.
//!
//! ## Environment Variables
//!
//! - LEXIFLOW_STREAM_PATH - Path to the JSONL stream (default: data/project_live.json)
//! - LEXIFLOW_WINDOW_CAPACITY - Points kept per rolling series (default: 50)
//! - LEXIFLOW_HIGH_CONTENT_THRESHOLD - Content score for high impact (default: 0.5)
//! - LEXIFLOW_POSITIVE_SENTIMENT_THRESHOLD - Sentiment for high impact (default: 0.3)
//! - LEXIFLOW_SIGNIFICANT_CONTENT_THRESHOLD - Content score for significant messages (default: 0.3)
//! - LEXIFLOW_RENDER_INTERVAL_SECS - Presenter cadence in seconds (default: 3.0)
//! - LEXIFLOW_POLL_INTERVAL_MS - Stream poll interval (default: 1000)
//! - LEXIFLOW_LEXICON_PATH - Lexicon JSON file (default: built-in lexicon)
//! - LEXIFLOW_OUTPUT_PATH - Output file for json/html presenters
//! - LEXIFLOW_FROM_START - Replay existing lines on startup (default: true)
//! - LEXIFLOW_FOLLOW - Keep waiting for new lines (default: true)
//! - LEXIFLOW_TUI_LOG_PATH - Log file while the tui presenter is active (default: lexiflow_tui.log)
//! - RUST_LOG - Logging level (optional, default: info)

use lexiflow::presenter::{DashboardPresenter, PresenterKind};
use lexiflow::stream_core::{EventScorer, JsonlTailReader, Lexicon, RollingAggregator};
use lexiflow::{Driver, DriverConfig, LexiflowConfig, StopReason};
use std::env;
use std::fs::File;

/// Logs go to stderr, except under the tui presenter where they would paint
/// over the frame and are written to `tui_log_path` instead.
fn init_logging(tui: bool, config: &LexiflowConfig) -> std::io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if tui {
        let file = File::create(&config.tui_log_path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else {
        builder.target(env_logger::Target::Stderr);
    }
    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let requested = PresenterKind::from_args(&args);
    let config = LexiflowConfig::from_env()?;

    init_logging(requested == Ok(PresenterKind::Tui), &config)?;

    let presenter_kind = requested.unwrap_or_else(|value| {
        log::warn!("Unknown --presenter value {:?}, falling back to log", value);
        PresenterKind::Log
    });

    log::info!("🚀 Starting Lexiflow");
    log::info!("   Stream: {}", config.stream_path.display());
    log::info!("   Window capacity: {}", config.window_capacity);
    log::info!(
        "   High impact: content >= {}, sentiment > {}",
        config.high_content_threshold,
        config.positive_sentiment_threshold
    );
    log::info!(
        "   Significant content: > {}",
        config.significant_content_threshold
    );
    log::info!(
        "   Render interval: {:.1}s",
        config.render_interval.as_secs_f64()
    );
    log::info!("   Presenter: {}", presenter_kind.as_str());

    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::load(path)?,
        None => {
            log::info!("📚 Using built-in lexicon");
            Lexicon::default()
        }
    };

    let mut reader = JsonlTailReader::new(config.stream_path.clone());
    if !config.from_start {
        reader = reader.skip_existing();
    }
    if !config.follow {
        reader = reader.once();
    }

    let presenter = DashboardPresenter::new(
        presenter_kind,
        config.output_path.clone(),
        config.render_interval,
    )?;

    let driver = Driver::new(
        reader,
        presenter,
        EventScorer::new(lexicon, config.detector()),
        RollingAggregator::new(config.window_capacity),
        DriverConfig {
            poll_interval: config.poll_interval,
            render_interval: config.render_interval,
            ..DriverConfig::default()
        },
    );

    let summary = driver
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for interrupt: {}", e);
                std::future::pending::<()>().await;
            }
            log::info!("Interrupted by user");
        })
        .await;

    let totals = summary.snapshot.totals;
    log::info!(
        "✅ Stopped ({}): {}/{} significant messages, {} high impact, {} opportunities, {} contributors",
        match summary.stop_reason {
            StopReason::EndOfStream => "end of stream",
            StopReason::Shutdown => "interrupted",
            StopReason::PresenterRequested => "quit",
        },
        totals.significant_count,
        totals.event_count,
        totals.high_impact_count,
        totals.opportunity_count,
        summary.snapshot.contributor_count
    );

    Ok(())
}
