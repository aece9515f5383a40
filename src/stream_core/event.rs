//! Event normalization from JSONL records to the unified Event struct

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const PRODUCER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed event: {0}")]
    Malformed(String),
}

/// One scored unit of text plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment: f64,
    pub declared_category: String,
    pub declared_keyword: String,
    pub length: usize,
}

/// Wire shape written by the producer. Every field is optional here so that
/// validation can report which one is missing instead of a serde message.
#[derive(Debug, Deserialize)]
struct RawEvent {
    message: Option<Value>,
    author: Option<Value>,
    timestamp: Option<Value>,
    sentiment: Option<Value>,
    category: Option<String>,
    keyword_mentioned: Option<String>,
    message_length: Option<usize>,
}

impl Event {
    /// Parse an Event from a JSONL line, stamping `arrived_at` when the
    /// record carries no timestamp of its own.
    pub fn from_jsonl(line: &str, arrived_at: DateTime<Utc>) -> Result<Self, EventError> {
        let value: Value = serde_json::from_str(line)?;
        if !value.is_object() {
            return Err(EventError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        let raw: RawEvent = serde_json::from_value(value)?;
        raw.validate(arrived_at)
    }

    /// Sentiment clipped to its positive half; zero or negative sentiment
    /// carries no impact.
    pub fn positive_sentiment(&self) -> f64 {
        self.sentiment.max(0.0)
    }
}

impl RawEvent {
    fn validate(self, arrived_at: DateTime<Utc>) -> Result<Event, EventError> {
        let text = match self.message {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(EventError::Malformed(format!(
                    "field `message` must be a string, got {}",
                    json_kind(&other)
                )))
            }
            None => return Err(EventError::Malformed("missing field `message`".into())),
        };

        let author = match self.author {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::String(_)) => {
                return Err(EventError::Malformed("field `author` is empty".into()))
            }
            Some(other) => {
                return Err(EventError::Malformed(format!(
                    "field `author` must be a string, got {}",
                    json_kind(&other)
                )))
            }
            None => return Err(EventError::Malformed("missing field `author`".into())),
        };

        let sentiment = match self.sentiment {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                EventError::Malformed(format!("field `sentiment` is not a number: {:?}", s))
            })?,
            Some(other) => {
                return Err(EventError::Malformed(format!(
                    "field `sentiment` must be a number, got {}",
                    json_kind(&other)
                )))
            }
        };
        if !sentiment.is_finite() || !(-1.0..=1.0).contains(&sentiment) {
            return Err(EventError::Malformed(format!(
                "field `sentiment` out of range [-1, 1]: {}",
                sentiment
            )));
        }

        let timestamp = match self.timestamp {
            None | Some(Value::Null) => arrived_at,
            Some(value) => parse_timestamp(&value)?,
        };

        let length = self.message_length.unwrap_or_else(|| text.chars().count());

        Ok(Event {
            text,
            author,
            timestamp,
            sentiment,
            declared_category: self.category.unwrap_or_else(|| "other".to_string()),
            declared_keyword: self.keyword_mentioned.unwrap_or_default(),
            length,
        })
    }
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, EventError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or_else(|| EventError::Malformed(format!("field `timestamp` out of range: {}", n))),
        Value::String(s) => {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, PRODUCER_TIMESTAMP_FORMAT) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    EventError::Malformed(format!("field `timestamp` not understood: {:?}", s))
                })
        }
        other => Err(EventError::Malformed(format!(
            "field `timestamp` must be a string or integer, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_producer_jsonl() {
        let line = r#"{"message": "I just read a verse about grace.", "author": "Eve", "timestamp": "2025-09-14 10:22:05", "category": "faith", "sentiment": 0.82, "keyword_mentioned": "grace", "message_length": 32}"#;

        let event = Event::from_jsonl(line, arrival()).unwrap();
        assert_eq!(event.text, "I just read a verse about grace.");
        assert_eq!(event.author, "Eve");
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2025, 9, 14, 10, 22, 5).unwrap()
        );
        assert_eq!(event.sentiment, 0.82);
        assert_eq!(event.declared_category, "faith");
        assert_eq!(event.declared_keyword, "grace");
        assert_eq!(event.length, 32);
    }

    #[test]
    fn test_optional_fields_default() {
        let line = r#"{"message": "hello there", "author": "Bob"}"#;

        let event = Event::from_jsonl(line, arrival()).unwrap();
        assert_eq!(event.sentiment, 0.0);
        assert_eq!(event.timestamp, arrival());
        assert_eq!(event.declared_category, "other");
        assert_eq!(event.declared_keyword, "");
        assert_eq!(event.length, 11);
    }

    #[test]
    fn test_null_sentiment_is_neutral() {
        let line = r#"{"message": "x", "author": "Bob", "sentiment": null}"#;
        let event = Event::from_jsonl(line, arrival()).unwrap();
        assert_eq!(event.sentiment, 0.0);
    }

    #[test]
    fn test_rfc3339_and_unix_timestamps() {
        let rfc = r#"{"message": "x", "author": "A", "timestamp": "2025-03-01T08:00:00+02:00"}"#;
        let event = Event::from_jsonl(rfc, arrival()).unwrap();
        assert_eq!(event.timestamp, Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap());

        let unix = r#"{"message": "x", "author": "A", "timestamp": 1700000000}"#;
        let event = Event::from_jsonl(unix, arrival()).unwrap();
        assert_eq!(event.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_missing_required_fields() {
        let no_message = r#"{"author": "Bob"}"#;
        assert!(matches!(
            Event::from_jsonl(no_message, arrival()),
            Err(EventError::Malformed(_))
        ));

        let no_author = r#"{"message": "hi"}"#;
        assert!(matches!(
            Event::from_jsonl(no_author, arrival()),
            Err(EventError::Malformed(_))
        ));

        let blank_author = r#"{"message": "hi", "author": "  "}"#;
        assert!(Event::from_jsonl(blank_author, arrival()).is_err());
    }

    #[test]
    fn test_sentiment_out_of_range() {
        let line = r#"{"message": "hi", "author": "Bob", "sentiment": 1.5}"#;
        assert!(matches!(
            Event::from_jsonl(line, arrival()),
            Err(EventError::Malformed(_))
        ));
    }

    #[test]
    fn test_malformed_jsonl() {
        let line = r#"{"invalid": "json"#;
        assert!(matches!(
            Event::from_jsonl(line, arrival()),
            Err(EventError::Json(_))
        ));

        assert!(matches!(
            Event::from_jsonl("[1, 2, 3]", arrival()),
            Err(EventError::Malformed(_))
        ));
    }

    #[test]
    fn test_positive_sentiment_clips_negative() {
        let line = r#"{"message": "x", "author": "A", "sentiment": -0.4}"#;
        let event = Event::from_jsonl(line, arrival()).unwrap();
        assert_eq!(event.positive_sentiment(), 0.0);

        let line = r#"{"message": "x", "author": "A", "sentiment": 0.6}"#;
        let event = Event::from_jsonl(line, arrival()).unwrap();
        assert_eq!(event.positive_sentiment(), 0.6);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let line = r#"{"message": "hi", "author": "Bob", "timestamp": "yesterday"}"#;
        assert!(Event::from_jsonl(line, arrival()).is_err());
    }
}
