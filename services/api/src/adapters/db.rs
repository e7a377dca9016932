//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lingo_core::domain::{NewPracticeRecord, PracticeKind, PracticeRecord};
use lingo_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(context: &str, e: sqlx::Error) -> PortError {
    error!("{}: {}", context, e);
    PortError::Unexpected(format!("{}: {}", context, e))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct PracticeRecordRow {
    id: Uuid,
    user_id: Uuid,
    kind: String,
    input_text: String,
    result: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl PracticeRecordRow {
    fn to_domain(self) -> PortResult<PracticeRecord> {
        let kind = PracticeKind::parse(&self.kind).ok_or_else(|| {
            error!("Practice record {} has unknown kind '{}'", self.id, self.kind);
            PortError::Unexpected(format!("Unknown practice kind '{}'", self.kind))
        })?;
        Ok(PracticeRecord {
            id: self.id,
            user_id: self.user_id,
            kind,
            input_text: self.input_text,
            result: self.result,
            created_at: self.created_at,
        })
    }
}

const COLUMNS: &str = "id, user_id, kind, input_text, result, created_at";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn save_practice_record(&self, record: NewPracticeRecord) -> PortResult<PracticeRecord> {
        let sql = format!(
            "INSERT INTO practice_records (id, user_id, kind, input_text, result) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, PracticeRecordRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(record.user_id)
            .bind(record.kind.as_str())
            .bind(&record.input_text)
            .bind(&record.result)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unexpected("Failed to save practice record", e))?;
        row.to_domain()
    }

    async fn get_practice_record(&self, id: Uuid) -> PortResult<PracticeRecord> {
        let sql = format!("SELECT {} FROM practice_records WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, PracticeRecordRow>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("Practice record {} not found", id))
                }
                _ => unexpected("Failed to load practice record", e),
            })?;
        row.to_domain()
    }

    async fn list_practice_records_for_user(&self, user_id: Uuid) -> PortResult<Vec<PracticeRecord>> {
        let sql = format!(
            "SELECT {} FROM practice_records WHERE user_id = $1 ORDER BY created_at DESC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, PracticeRecordRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unexpected("Failed to list practice records", e))?;

        rows.into_iter().map(PracticeRecordRow::to_domain).collect()
    }
}
