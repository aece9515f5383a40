//! Runtime configuration from environment variables

use crate::stream_core::detector::{
    DEFAULT_HIGH_CONTENT_THRESHOLD, DEFAULT_POSITIVE_SENTIMENT_THRESHOLD,
    DEFAULT_SIGNIFICANT_CONTENT_THRESHOLD,
};
use crate::stream_core::{SignalDetector, DEFAULT_WINDOW_CAPACITY};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Configuration for the lexiflow runtime.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiflowConfig {
    /// JSONL file the producer appends to
    pub stream_path: PathBuf,

    /// Number of points kept in each rolling series
    pub window_capacity: usize,

    pub high_content_threshold: f64,
    pub positive_sentiment_threshold: f64,
    pub significant_content_threshold: f64,

    /// Presenter cadence
    pub render_interval: Duration,

    /// Delay between stream polls
    pub poll_interval: Duration,

    /// Optional lexicon JSON; the built-in lexicon is used when unset
    pub lexicon_path: Option<PathBuf>,

    /// Where file-based presenters write; each presenter has its own default
    pub output_path: Option<PathBuf>,

    /// Replay the stream from its first line instead of its current end
    pub from_start: bool,

    /// Keep waiting for new lines; when false the stream ends at EOF
    pub follow: bool,

    /// Log file used while the terminal presenter owns the screen
    pub tui_log_path: PathBuf,
}

impl Default for LexiflowConfig {
    fn default() -> Self {
        Self {
            stream_path: PathBuf::from("data/project_live.json"),
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            high_content_threshold: DEFAULT_HIGH_CONTENT_THRESHOLD,
            positive_sentiment_threshold: DEFAULT_POSITIVE_SENTIMENT_THRESHOLD,
            significant_content_threshold: DEFAULT_SIGNIFICANT_CONTENT_THRESHOLD,
            render_interval: Duration::from_secs(3),
            poll_interval: Duration::from_millis(1000),
            lexicon_path: None,
            output_path: None,
            from_start: true,
            follow: true,
            tui_log_path: PathBuf::from("lexiflow_tui.log"),
        }
    }
}

impl LexiflowConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `LEXIFLOW_STREAM_PATH` (default: data/project_live.json)
    /// - `LEXIFLOW_WINDOW_CAPACITY` (default: 50)
    /// - `LEXIFLOW_HIGH_CONTENT_THRESHOLD` (default: 0.5)
    /// - `LEXIFLOW_POSITIVE_SENTIMENT_THRESHOLD` (default: 0.3)
    /// - `LEXIFLOW_SIGNIFICANT_CONTENT_THRESHOLD` (default: 0.3)
    /// - `LEXIFLOW_RENDER_INTERVAL_SECS` (default: 3.0)
    /// - `LEXIFLOW_POLL_INTERVAL_MS` (default: 1000)
    /// - `LEXIFLOW_LEXICON_PATH` (optional)
    /// - `LEXIFLOW_OUTPUT_PATH` (optional)
    /// - `LEXIFLOW_FROM_START` (default: true)
    /// - `LEXIFLOW_FOLLOW` (default: true)
    /// - `LEXIFLOW_TUI_LOG_PATH` (default: lexiflow_tui.log)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            stream_path: lookup("LEXIFLOW_STREAM_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.stream_path),
            window_capacity: parse_or(&lookup, "LEXIFLOW_WINDOW_CAPACITY", defaults.window_capacity)?,
            high_content_threshold: parse_or(
                &lookup,
                "LEXIFLOW_HIGH_CONTENT_THRESHOLD",
                defaults.high_content_threshold,
            )?,
            positive_sentiment_threshold: parse_or(
                &lookup,
                "LEXIFLOW_POSITIVE_SENTIMENT_THRESHOLD",
                defaults.positive_sentiment_threshold,
            )?,
            significant_content_threshold: parse_or(
                &lookup,
                "LEXIFLOW_SIGNIFICANT_CONTENT_THRESHOLD",
                defaults.significant_content_threshold,
            )?,
            render_interval: parse_opt::<f64, _>(&lookup, "LEXIFLOW_RENDER_INTERVAL_SECS")?
                .map(|secs| seconds("LEXIFLOW_RENDER_INTERVAL_SECS", secs))
                .transpose()?
                .unwrap_or(defaults.render_interval),
            poll_interval: parse_opt::<u64, _>(&lookup, "LEXIFLOW_POLL_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            lexicon_path: lookup("LEXIFLOW_LEXICON_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            output_path: lookup("LEXIFLOW_OUTPUT_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            from_start: parse_or(&lookup, "LEXIFLOW_FROM_START", defaults.from_start)?,
            follow: parse_or(&lookup, "LEXIFLOW_FOLLOW", defaults.follow)?,
            tui_log_path: lookup("LEXIFLOW_TUI_LOG_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.tui_log_path),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(invalid("LEXIFLOW_WINDOW_CAPACITY", "must be at least 1"));
        }
        check_range(
            "LEXIFLOW_HIGH_CONTENT_THRESHOLD",
            self.high_content_threshold,
            0.0,
            1.0,
        )?;
        check_range(
            "LEXIFLOW_POSITIVE_SENTIMENT_THRESHOLD",
            self.positive_sentiment_threshold,
            -1.0,
            1.0,
        )?;
        check_range(
            "LEXIFLOW_SIGNIFICANT_CONTENT_THRESHOLD",
            self.significant_content_threshold,
            0.0,
            1.0,
        )?;
        if self.render_interval.is_zero() {
            return Err(invalid("LEXIFLOW_RENDER_INTERVAL_SECS", "must be positive"));
        }
        Ok(())
    }

    pub fn detector(&self) -> SignalDetector {
        SignalDetector::new(
            self.high_content_threshold,
            self.positive_sentiment_threshold,
            self.significant_content_threshold,
        )
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: reason.into(),
    }
}

fn parse_opt<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, format!("cannot parse {:?}", raw))),
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn seconds(key: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| invalid(key, format!("not a valid duration: {}", secs)))
}

fn check_range(key: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(invalid(
            key,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LexiflowConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, LexiflowConfig::default());
        assert_eq!(config.window_capacity, 50);
        assert_eq!(config.render_interval, Duration::from_secs(3));
        assert!(config.lexicon_path.is_none());
        assert!(config.from_start);
        assert_eq!(config.tui_log_path, PathBuf::from("lexiflow_tui.log"));
    }

    #[test]
    fn test_custom_config() {
        let config = LexiflowConfig::from_lookup(lookup_from(&[
            ("LEXIFLOW_STREAM_PATH", "/tmp/live.jsonl"),
            ("LEXIFLOW_WINDOW_CAPACITY", "10"),
            ("LEXIFLOW_HIGH_CONTENT_THRESHOLD", "0.25"),
            ("LEXIFLOW_RENDER_INTERVAL_SECS", "0.5"),
            ("LEXIFLOW_POLL_INTERVAL_MS", "250"),
            ("LEXIFLOW_LEXICON_PATH", "lexicon.json"),
            ("LEXIFLOW_FROM_START", "false"),
            ("LEXIFLOW_TUI_LOG_PATH", "/tmp/lexiflow.log"),
        ]))
        .unwrap();

        assert_eq!(config.stream_path, PathBuf::from("/tmp/live.jsonl"));
        assert_eq!(config.window_capacity, 10);
        assert_eq!(config.high_content_threshold, 0.25);
        assert_eq!(config.render_interval, Duration::from_millis(500));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.lexicon_path, Some(PathBuf::from("lexicon.json")));
        assert!(!config.from_start);
        assert!(config.follow);
        assert_eq!(config.tui_log_path, PathBuf::from("/tmp/lexiflow.log"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases: [(&str, &str); 5] = [
            ("LEXIFLOW_WINDOW_CAPACITY", "0"),
            ("LEXIFLOW_WINDOW_CAPACITY", "many"),
            ("LEXIFLOW_HIGH_CONTENT_THRESHOLD", "1.5"),
            ("LEXIFLOW_POSITIVE_SENTIMENT_THRESHOLD", "NaN"),
            ("LEXIFLOW_RENDER_INTERVAL_SECS", "0"),
        ];
        for (key, value) in cases {
            let result = LexiflowConfig::from_lookup(lookup_from(&[(key, value)]));
            assert!(result.is_err(), "{}={} should be rejected", key, value);
        }
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = LexiflowConfig::from_lookup(lookup_from(&[
            ("LEXIFLOW_WINDOW_CAPACITY", " "),
            ("LEXIFLOW_LEXICON_PATH", ""),
        ]))
        .unwrap();

        assert_eq!(config.window_capacity, 50);
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn test_detector_from_config() {
        let config = LexiflowConfig {
            high_content_threshold: 0.8,
            ..LexiflowConfig::default()
        };
        let detector = config.detector();

        assert!(!detector.is_high_impact(0.75, 0.9));
        assert!(detector.is_high_impact(0.8, 0.9));
    }
}
