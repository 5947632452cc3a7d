//! SQLite backed execution history.
//!
//! Each record is stored as its JSON document next to the columns used for
//! filtering. `seq` preserves append order.

use async_trait::async_trait;
use executors::{ExecutionRecord, HistoryError, HistoryFilter, HistoryStore};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, record: ExecutionRecord) -> Result<(), HistoryError> {
        let document = serde_json::to_string(&record)?;

        sqlx::query(
            r#"
            INSERT INTO execution_records (id, module, success, timestamp, record)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.module)
        .bind(record.success)
        .bind(record.timestamp.to_rfc3339())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(HistoryError::backend)?;

        Ok(())
    }

    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<ExecutionRecord>, HistoryError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT record FROM execution_records WHERE 1 = 1");
        if let Some(module) = &filter.module {
            builder.push(" AND module = ").push_bind(module.clone());
        }
        if let Some(success) = filter.success {
            builder.push(" AND success = ").push_bind(success);
        }
        match filter.limit {
            Some(limit) => {
                let limit = i64::try_from(limit).unwrap_or(i64::MAX);
                builder.push(" ORDER BY seq DESC LIMIT ").push_bind(limit);
            }
            None => {
                builder.push(" ORDER BY seq ASC");
            }
        }

        let documents: Vec<String> = builder
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(HistoryError::backend)?;

        let mut records = documents
            .iter()
            .map(|doc| serde_json::from_str::<ExecutionRecord>(doc))
            .collect::<Result<Vec<_>, _>>()?;
        if filter.limit.is_some() {
            records.reverse();
        }
        Ok(records)
    }

    async fn clear(&self) -> Result<usize, HistoryError> {
        let result = sqlx::query("DELETE FROM execution_records")
            .execute(&self.pool)
            .await
            .map_err(HistoryError::backend)?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use chrono::Utc;
    use executors::{ModuleDispatcher, UnitError, executors::Echo};
    use serde_json::json;

    use super::*;
    use crate::DBService;

    async fn store() -> SqliteHistoryStore {
        let db = DBService::new_in_memory().await.unwrap();
        SqliteHistoryStore::new(db.pool)
    }

    fn record(module: &str, input: i64) -> ExecutionRecord {
        ExecutionRecord::completed(
            module,
            Utc::now(),
            json!(input),
            json!({"value": input}),
            Duration::from_millis(2),
            Some(json!({"value": input})),
        )
    }

    #[tokio::test]
    async fn test_round_trips_records_in_append_order() {
        let store = store().await;
        let first = record("echo", 1);
        let second = record("sentiment", 2);
        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let all = store.query(&HistoryFilter::default()).await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_filters_and_limit() {
        let store = store().await;
        for n in 0..4 {
            store.append(record("echo", n)).await.unwrap();
        }
        let err = UnitError::Failed("bad".to_string());
        store
            .append(ExecutionRecord::failed(
                "sentiment",
                Utc::now(),
                json!(null),
                &err,
                Duration::ZERO,
                None,
            ))
            .await
            .unwrap();

        let failed = store
            .query(&HistoryFilter {
                success: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].error.as_deref(), Some("bad"));

        let latest = store
            .query(&HistoryFilter {
                module: Some("echo".to_string()),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        let inputs: Vec<_> = latest.into_iter().map(|r| r.input).collect();
        assert_eq!(inputs, vec![json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = store().await;
        store.append(record("echo", 1)).await.unwrap();
        store.append(record("echo", 2)).await.unwrap();
        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.query(&HistoryFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatcher_over_sqlite_store() {
        let dispatcher = ModuleDispatcher::with_history(Arc::new(store().await));
        dispatcher.register("echo", Echo).await.unwrap();
        dispatcher
            .execute("echo", json!({"x": 1}), Some(json!({"x": 2})))
            .await
            .unwrap();

        let history = dispatcher.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].output_matched, Some(false));
        assert_eq!(history[0].result, Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("history.sqlite").display());

        let first = SqliteHistoryStore::new(DBService::new(&url).await.unwrap().pool);
        first.append(record("echo", 7)).await.unwrap();

        let reopened = SqliteHistoryStore::new(DBService::new(&url).await.unwrap().pool);
        let all = reopened.query(&HistoryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].input, json!(7));
    }
}
