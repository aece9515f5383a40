//! Unified presenter interface for aggregate snapshots
//!
//! Routes rendering to the log, a JSON file, an HTML dashboard or the
//! terminal UI based on configuration.

pub mod backend;
pub mod html_dashboard;
pub mod json_writer;
pub mod log_presenter;

pub use backend::{Presenter, PresenterError};
pub use html_dashboard::HtmlDashboard;
pub use json_writer::JsonSnapshotWriter;
pub use log_presenter::LogPresenter;

use crate::stream_core::Snapshot;
use crate::ui::TerminalPresenter;
use async_trait::async_trait;
use ratatui::backend::CrosstermBackend;
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    Log,
    Json,
    Html,
    Tui,
}

impl PresenterKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "log" => Some(PresenterKind::Log),
            "json" => Some(PresenterKind::Json),
            "html" => Some(PresenterKind::Html),
            "tui" => Some(PresenterKind::Tui),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresenterKind::Log => "log",
            PresenterKind::Json => "json",
            PresenterKind::Html => "html",
            PresenterKind::Tui => "tui",
        }
    }

    /// Parse `--presenter <kind>` from command line arguments. No flag means
    /// the log presenter; an unknown or missing value is returned as the error.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        match args.iter().position(|x| x == "--presenter") {
            None => Ok(PresenterKind::Log),
            Some(idx) => {
                let value = args.get(idx + 1).cloned().unwrap_or_default();
                Self::from_str(&value).ok_or(value)
            }
        }
    }

    pub fn default_output_path(&self) -> Option<PathBuf> {
        match self {
            PresenterKind::Json => Some(PathBuf::from("lexiflow_snapshot.json")),
            PresenterKind::Html => Some(PathBuf::from("lexiflow_dashboard.html")),
            PresenterKind::Log | PresenterKind::Tui => None,
        }
    }
}

/// Presenter that routes to the configured output
pub enum DashboardPresenter {
    Log(LogPresenter),
    Json(JsonSnapshotWriter),
    Html(HtmlDashboard),
    Tui(TerminalPresenter<CrosstermBackend<Stdout>>),
}

impl DashboardPresenter {
    pub fn new(
        kind: PresenterKind,
        output_path: Option<PathBuf>,
        render_interval: Duration,
    ) -> Result<Self, PresenterError> {
        let path = || {
            output_path
                .clone()
                .or_else(|| kind.default_output_path())
                .unwrap_or_default()
        };
        match kind {
            PresenterKind::Log => Ok(DashboardPresenter::Log(LogPresenter::default())),
            PresenterKind::Json => Ok(DashboardPresenter::Json(JsonSnapshotWriter::new(path()))),
            PresenterKind::Html => Ok(DashboardPresenter::Html(HtmlDashboard::new(
                path(),
                render_interval,
            ))),
            PresenterKind::Tui => Ok(DashboardPresenter::Tui(TerminalPresenter::stdout()?)),
        }
    }
}

#[async_trait]
impl Presenter for DashboardPresenter {
    async fn render(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        match self {
            DashboardPresenter::Log(p) => p.render(snapshot).await,
            DashboardPresenter::Json(p) => p.render(snapshot).await,
            DashboardPresenter::Html(p) => p.render(snapshot).await,
            DashboardPresenter::Tui(p) => p.render(snapshot).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DashboardPresenter::Log(p) => p.name(),
            DashboardPresenter::Json(p) => p.name(),
            DashboardPresenter::Html(p) => p.name(),
            DashboardPresenter::Tui(p) => p.name(),
        }
    }

    fn wants_shutdown(&self) -> bool {
        match self {
            DashboardPresenter::Tui(p) => p.wants_shutdown(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_presenter_kind_from_args() {
        assert_eq!(PresenterKind::from_args(&args(&["lexiflow"])), Ok(PresenterKind::Log));
        assert_eq!(
            PresenterKind::from_args(&args(&["lexiflow", "--presenter", "html"])),
            Ok(PresenterKind::Html)
        );
        assert_eq!(
            PresenterKind::from_args(&args(&["lexiflow", "--presenter", "tui"])),
            Ok(PresenterKind::Tui)
        );
        assert_eq!(
            PresenterKind::from_args(&args(&["lexiflow", "--presenter", "png"])),
            Err("png".to_string())
        );
        assert_eq!(
            PresenterKind::from_args(&args(&["lexiflow", "--presenter"])),
            Err(String::new())
        );
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in [
            PresenterKind::Log,
            PresenterKind::Json,
            PresenterKind::Html,
            PresenterKind::Tui,
        ] {
            assert_eq!(PresenterKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[tokio::test]
    async fn test_dashboard_routes_to_json_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snap.json");
        let mut presenter = DashboardPresenter::new(
            PresenterKind::Json,
            Some(path.clone()),
            Duration::from_secs(3),
        )
        .unwrap();

        assert_eq!(presenter.name(), "json");
        presenter
            .render(&crate::stream_core::RollingAggregator::new(2).snapshot())
            .await
            .unwrap();
        assert!(path.exists());
        assert!(!presenter.wants_shutdown());
    }

    #[test]
    fn test_default_output_paths() {
        assert_eq!(
            PresenterKind::Html.default_output_path(),
            Some(PathBuf::from("lexiflow_dashboard.html"))
        );
        assert!(PresenterKind::Log.default_output_path().is_none());
    }
}
