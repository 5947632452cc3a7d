use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{compare::structurally_equal, executors::UnitError};

/// A unit returned normally but its output differs from the caller's
/// expectation. Recorded on the execution record, never raised.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Output of module '{module}' does not match the expected output")]
pub struct ValidationMismatch {
    pub module: String,
}

/// One entry of the execution history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub module: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_matched: Option<bool>,
}

impl ExecutionRecord {
    /// Builds the record of a unit that returned `result`, validating it
    /// against `expected_output` when one was supplied.
    pub fn completed(
        module: &str,
        timestamp: DateTime<Utc>,
        input: Value,
        result: Value,
        elapsed: Duration,
        expected_output: Option<Value>,
    ) -> Self {
        let (success, output_matched, error) = match &expected_output {
            None => (true, None, None),
            Some(expected) if structurally_equal(&result, expected) => (true, Some(true), None),
            Some(_) => {
                let mismatch = ValidationMismatch {
                    module: module.to_string(),
                };
                (false, Some(false), Some(mismatch.to_string()))
            }
        };

        Self {
            id: Uuid::new_v4(),
            timestamp,
            module: module.to_string(),
            input,
            result: Some(result),
            error,
            execution_time_ms: elapsed_ms(elapsed),
            success,
            expected_output,
            output_matched,
        }
    }

    /// Builds the record of a unit that failed. No result is attached; a
    /// supplied expectation is kept but never evaluated.
    pub fn failed(
        module: &str,
        timestamp: DateTime<Utc>,
        input: Value,
        err: &UnitError,
        elapsed: Duration,
        expected_output: Option<Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            module: module.to_string(),
            input,
            result: None,
            error: Some(err.to_string()),
            execution_time_ms: elapsed_ms(elapsed),
            success: false,
            expected_output,
            output_matched: None,
        }
    }

    /// True when the unit ran but its output failed validation.
    pub fn is_mismatch(&self) -> bool {
        self.output_matched == Some(false)
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed_without_expectation_omits_match_fields() {
        let record = ExecutionRecord::completed(
            "echo",
            Utc::now(),
            json!({"x": 1}),
            json!({"x": 1}),
            Duration::from_millis(3),
            None,
        );
        assert!(record.success);
        assert_eq!(record.output_matched, None);
        assert_eq!(record.execution_time_ms, 3);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("outputMatched").is_none());
        assert!(json.get("expectedOutput").is_none());
        assert_eq!(json["executionTimeMs"], json!(3));
    }

    #[test]
    fn test_completed_mismatch_keeps_actual_result() {
        let record = ExecutionRecord::completed(
            "echo",
            Utc::now(),
            json!({"x": 1}),
            json!({"x": 1}),
            Duration::ZERO,
            Some(json!({"x": 2})),
        );
        assert!(!record.success);
        assert!(record.is_mismatch());
        assert_eq!(record.result, Some(json!({"x": 1})));
        assert_eq!(
            record.error.as_deref(),
            Some("Output of module 'echo' does not match the expected output")
        );
    }

    #[test]
    fn test_failed_record_has_no_result() {
        let err = UnitError::Failed("boom".to_string());
        let record = ExecutionRecord::failed(
            "broken",
            Utc::now(),
            json!(null),
            &err,
            Duration::ZERO,
            None,
        );
        assert!(!record.success);
        assert_eq!(record.result, None);
        assert_eq!(record.error.as_deref(), Some("boom"));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("result").is_none());
        assert!(json.get("expectedOutput").is_none());
    }

    #[test]
    fn test_failed_record_keeps_expected_output() {
        let err = UnitError::Failed("boom".to_string());
        let record = ExecutionRecord::failed(
            "broken",
            Utc::now(),
            json!("in"),
            &err,
            Duration::ZERO,
            Some(json!({"x": 1})),
        );
        assert_eq!(record.expected_output, Some(json!({"x": 1})));
        assert_eq!(record.output_matched, None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["expectedOutput"], json!({"x": 1}));
        assert!(json.get("outputMatched").is_none());
    }
}
