//! Parsing of JSON transaction records

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::RecordError;

/// Timestamp layout of the `created_time` field
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A validated edge event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub actor: String,
    pub target: String,

    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

/// Record as it appears on the wire; other fields are ignored
#[derive(Debug, Deserialize)]
struct RawTransaction {
    actor: Option<String>,
    target: Option<String>,
    created_time: Option<String>,
}

/// Parse one input line into a transaction.
///
/// Self-loops are not rejected here; the graph decides about those.
pub fn parse_line(line: &str) -> Result<Transaction, RecordError> {
    let raw: RawTransaction = serde_json::from_str(line)?;

    let actor = non_empty(raw.actor, "actor")?;
    let target = non_empty(raw.target, "target")?;
    let created_time = non_empty(raw.created_time, "created_time")?;
    let timestamp = parse_timestamp(&created_time)?;

    Ok(Transaction {
        actor,
        target,
        timestamp,
    })
}

/// Convert `YYYY-MM-DDTHH:MM:SSZ` (UTC) to epoch seconds.
///
/// Every field must be zero-padded to its full width; chrono alone would
/// also take single digits and a signed year.
pub fn parse_timestamp(value: &str) -> Result<i64, RecordError> {
    if !has_timestamp_shape(value) {
        return Err(RecordError::Timestamp {
            value: value.to_owned(),
            source: None,
        });
    }
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|source| RecordError::Timestamp {
            value: value.to_owned(),
            source: Some(source),
        })
}

/// 20 bytes: digits with `-`, `T`, `:` and `Z` at their fixed offsets
fn has_timestamp_shape(value: &str) -> bool {
    const LAYOUT: &[u8; 20] = b"0000-00-00T00:00:00Z";
    let bytes = value.as_bytes();
    bytes.len() == LAYOUT.len()
        && bytes.iter().zip(LAYOUT).all(|(&byte, &expected)| match expected {
            b'0' => byte.is_ascii_digit(),
            _ => byte == expected,
        })
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RecordError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let line = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "Jamie-Korn", "actor": "Jordan-Gruber"}"#;
        let tx = parse_line(line).unwrap();
        assert_eq!(tx.actor, "Jordan-Gruber");
        assert_eq!(tx.target, "Jamie-Korn");
        assert_eq!(tx.timestamp, 1_459_999_999);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let line = r#"{"actor": "a", "target": "b", "created_time": "1970-01-01T00:01:00Z", "amount": 12.5}"#;
        assert_eq!(parse_line(line).unwrap().timestamp, 60);
    }

    #[test]
    fn test_escaped_quotes_in_names() {
        let line = r#"{"actor": "the \"boss\"", "target": "b", "created_time": "1970-01-01T00:00:00Z"}"#;
        assert_eq!(parse_line(line).unwrap().actor, "the \"boss\"");
    }

    #[test]
    fn test_self_loop_is_parsed() {
        let line = r#"{"actor": "a", "target": "a", "created_time": "1970-01-01T00:00:00Z"}"#;
        let tx = parse_line(line).unwrap();
        assert_eq!(tx.actor, tx.target);
    }

    #[test]
    fn test_missing_field() {
        let line = r#"{"actor": "a", "created_time": "1970-01-01T00:00:00Z"}"#;
        assert!(matches!(parse_line(line), Err(RecordError::MissingField("target"))));
    }

    #[test]
    fn test_empty_and_null_fields() {
        let empty = r#"{"actor": "", "target": "b", "created_time": "1970-01-01T00:00:00Z"}"#;
        assert!(matches!(parse_line(empty), Err(RecordError::MissingField("actor"))));

        let null = r#"{"actor": "a", "target": "b", "created_time": null}"#;
        assert!(matches!(parse_line(null), Err(RecordError::MissingField("created_time"))));
    }

    #[test]
    fn test_bad_timestamp() {
        for value in ["2016-04-07 03:33:19", "2016-13-07T03:33:19Z", "yesterday", "2016-04-07T03:33:19"] {
            let line = format!(r#"{{"actor": "a", "target": "b", "created_time": "{value}"}}"#);
            assert!(
                matches!(parse_line(&line), Err(RecordError::Timestamp { .. })),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_timestamp_fields_must_be_zero_padded() {
        for value in [
            "2016-4-7T3:3:9Z",
            "+2016-04-07T03:33:19Z",
            "16-04-07T03:33:19Z",
            "2016-04-07T03:33:19Z ",
            "2016-04-07T03:33:1aZ",
        ] {
            assert!(
                matches!(
                    parse_timestamp(value),
                    Err(RecordError::Timestamp { source: None, .. })
                ),
                "{value} should be rejected"
            );
        }
        assert!(matches!(
            parse_timestamp("2016-13-07T03:33:19Z"),
            Err(RecordError::Timestamp { source: Some(_), .. })
        ));
        assert_eq!(parse_timestamp("2016-04-07T03:33:19Z").unwrap(), 1_459_999_999);
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(parse_line("actor=a target=b"), Err(RecordError::Json(_))));
        assert!(matches!(parse_line(r#"{"actor": "a""#), Err(RecordError::Json(_))));
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let line = r#"{"actor": 7, "target": "b", "created_time": "1970-01-01T00:00:00Z"}"#;
        assert!(matches!(parse_line(line), Err(RecordError::Json(_))));
    }
}
