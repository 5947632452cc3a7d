//! Execution history storage.
//!
//! The dispatcher appends one [`ExecutionRecord`] per attempt through the
//! [`HistoryStore`] trait. [`InMemoryHistory`] keeps the log for the
//! lifetime of the process; durable stores live in other crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use ts_rs::TS;

use crate::record::ExecutionRecord;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Failed to (de)serialize execution record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HistoryError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HistoryError::Backend(Box::new(err))
    }
}

/// Narrows a history query. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct HistoryFilter {
    /// Only records produced by this module
    #[serde(default)]
    pub module: Option<String>,
    /// Only successful (or only failed) records
    #[serde(default)]
    pub success: Option<bool>,
    /// Keep the most recent `limit` matches, still returned oldest first
    #[serde(default)]
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &ExecutionRecord) -> bool {
        if let Some(module) = &self.module
            && &record.module != module
        {
            return false;
        }
        if let Some(success) = self.success
            && record.success != success
        {
            return false;
        }
        true
    }

    /// Applies the filter to records already in chronological order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<ExecutionRecord>
    where
        I: IntoIterator<Item = &'a ExecutionRecord>,
    {
        let mut matched: Vec<ExecutionRecord> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        if let Some(limit) = self.limit
            && matched.len() > limit
        {
            matched.drain(..matched.len() - limit);
        }
        matched
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one record at the end of the log.
    async fn append(&self, record: ExecutionRecord) -> Result<(), HistoryError>;

    /// Returns matching records in chronological (append) order.
    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<ExecutionRecord>, HistoryError>;

    /// Removes every record, returning how many were dropped.
    async fn clear(&self) -> Result<usize, HistoryError>;
}

/// Process-lifetime history log.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: RwLock<Vec<ExecutionRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, record: ExecutionRecord) -> Result<(), HistoryError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<ExecutionRecord>, HistoryError> {
        let records = self.records.read().await;
        Ok(filter.apply(records.iter()))
    }

    async fn clear(&self) -> Result<usize, HistoryError> {
        let drained = std::mem::take(&mut *self.records.write().await);
        Ok(drained.len())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::executors::UnitError;

    fn ok_record(module: &str, n: i64) -> ExecutionRecord {
        ExecutionRecord::completed(
            module,
            Utc::now(),
            json!(n),
            json!(n),
            Duration::ZERO,
            None,
        )
    }

    fn failed_record(module: &str) -> ExecutionRecord {
        let err = UnitError::Failed("nope".to_string());
        ExecutionRecord::failed(module, Utc::now(), json!(null), &err, Duration::ZERO, None)
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let history = InMemoryHistory::new();
        for n in 0..5 {
            history.append(ok_record("echo", n)).await.unwrap();
        }
        let all = history.query(&HistoryFilter::default()).await.unwrap();
        let inputs: Vec<_> = all.iter().map(|r| r.input.clone()).collect();
        assert_eq!(inputs, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
    }

    #[tokio::test]
    async fn test_filter_by_module_success_and_limit() {
        let history = InMemoryHistory::new();
        history.append(ok_record("echo", 1)).await.unwrap();
        history.append(failed_record("sentiment")).await.unwrap();
        history.append(ok_record("echo", 2)).await.unwrap();
        history.append(ok_record("sentiment", 3)).await.unwrap();
        history.append(ok_record("echo", 4)).await.unwrap();

        let echo = history
            .query(&HistoryFilter {
                module: Some("echo".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(echo.len(), 3);

        let failures = history
            .query(&HistoryFilter {
                success: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].module, "sentiment");

        let latest_echo = history
            .query(&HistoryFilter {
                module: Some("echo".to_string()),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        let inputs: Vec<_> = latest_echo.iter().map(|r| r.input.clone()).collect();
        assert_eq!(inputs, vec![json!(2), json!(4)]);
    }

    #[tokio::test]
    async fn test_clear_reports_removed_count() {
        let history = InMemoryHistory::new();
        history.append(ok_record("echo", 1)).await.unwrap();
        history.append(ok_record("echo", 2)).await.unwrap();
        assert_eq!(history.clear().await.unwrap(), 2);
        assert!(history.query(&HistoryFilter::default()).await.unwrap().is_empty());
        assert_eq!(history.clear().await.unwrap(), 0);
    }
}
