// src/core/database.rs
//! SQLite persistence for saved fields, one collection per owner

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

use crate::app_log;
use crate::core::FsOps;
use crate::error::StoreError;
use crate::types::{SavedField, StoredField};

// ===== Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        FsOps::ensure_parent_dir(database_path).await?;

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database, gone when the pool closes
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_fields (
                owner TEXT NOT NULL,
                field_id TEXT NOT NULL,
                definition TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (owner, field_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create saved_fields table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_saved_fields_owner ON saved_fields(owner)")
            .execute(&self.pool)
            .await
            .context("Failed to create saved_fields owner index")?;

        app_log!(info, "Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Rows =====

#[derive(Debug, sqlx::FromRow)]
struct SavedFieldRow {
    owner: String,
    definition: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SavedFieldRow {
    fn into_stored(self) -> Result<StoredField, StoreError> {
        // Stored definitions go through the same boundary decoding as drafts,
        // so legacy single-string labels still load.
        let field: SavedField = serde_json::from_str(&self.definition)?;
        Ok(StoredField {
            owner: self.owner,
            field,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ===== Saved Field Repository =====

pub struct SavedFieldRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SavedFieldRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All fields of an owner, ordered by field id
    pub async fn list(&self, owner: &str) -> Result<Vec<StoredField>, StoreError> {
        let rows = sqlx::query_as::<_, SavedFieldRow>(
            r#"
            SELECT owner, definition, created_at, updated_at
            FROM saved_fields
            WHERE owner = ?
            ORDER BY field_id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(SavedFieldRow::into_stored).collect()
    }

    pub async fn find(
        &self,
        owner: &str,
        field_id: &str,
    ) -> Result<Option<StoredField>, StoreError> {
        let row = sqlx::query_as::<_, SavedFieldRow>(
            r#"
            SELECT owner, definition, created_at, updated_at
            FROM saved_fields
            WHERE owner = ? AND field_id = ?
            "#,
        )
        .bind(owner)
        .bind(field_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(SavedFieldRow::into_stored).transpose()
    }

    /// Insert a new field; an existing id for the same owner is a conflict
    pub async fn insert(&self, owner: &str, field: &SavedField) -> Result<StoredField, StoreError> {
        let now = Utc::now();
        let definition = serde_json::to_string(field)?;

        sqlx::query(
            r#"
            INSERT INTO saved_fields (owner, field_id, definition, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner)
        .bind(&field.field_id)
        .bind(&definition)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict {
                field_id: field.field_id.clone(),
            },
            other => StoreError::Database(other),
        })?;

        app_log!(info, "Created saved field {} for owner {}", field.field_id, owner);

        Ok(StoredField {
            owner: owner.to_string(),
            field: field.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the definition of an existing field. `None` when it does not exist.
    pub async fn replace(
        &self,
        owner: &str,
        field: &SavedField,
    ) -> Result<Option<StoredField>, StoreError> {
        let definition = serde_json::to_string(field)?;

        let result = sqlx::query(
            r#"
            UPDATE saved_fields
            SET definition = ?, updated_at = ?
            WHERE owner = ? AND field_id = ?
            "#,
        )
        .bind(&definition)
        .bind(Utc::now())
        .bind(owner)
        .bind(&field.field_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        app_log!(info, "Updated saved field {} for owner {}", field.field_id, owner);
        self.find(owner, &field.field_id).await
    }

    pub async fn delete(&self, owner: &str, field_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM saved_fields WHERE owner = ? AND field_id = ?")
            .bind(owner)
            .bind(field_id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            app_log!(info, "Deleted saved field {} for owner {}", field_id, owner);
        }

        Ok(deleted)
    }
}
