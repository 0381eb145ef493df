//! SQLite-backed persistence for todos.

use std::{path::Path, str::FromStr, time::Duration};

use chrono::Utc;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{NewTodo, TodoPatch, TodoRecord};

pub static MIGRATOR: Migrator = sqlx::migrate!();

const TODO_FIELDS: &str = "id, task, completed, priority, description, due_date, tags, \
                           assigned_to, category, created_at, updated_at";

/// Handle to the todo table. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// Open (creating if missing) the database at `db_path` and run migrations.
    pub async fn open(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_url = format!("sqlite://{}", db_path.as_ref().to_string_lossy());
        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;
        tracing::info!(path = %db_path.as_ref().display(), "todo store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All todos in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<TodoRecord>> {
        let sql = format!("SELECT {TODO_FIELDS} FROM todos ORDER BY rowid");
        let todos = sqlx::query_as::<_, TodoRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<TodoRecord> {
        let sql = format!("SELECT {TODO_FIELDS} FROM todos WHERE id = ?");
        sqlx::query_as::<_, TodoRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn insert(&self, input: NewTodo) -> StoreResult<TodoRecord> {
        let todo = input.into_record(Utc::now())?;
        sqlx::query(
            "INSERT INTO todos (id, task, completed, priority, description, due_date, tags, \
             assigned_to, category, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(todo.id)
        .bind(&todo.task)
        .bind(todo.completed)
        .bind(todo.priority)
        .bind(&todo.description)
        .bind(todo.due_date)
        .bind(&todo.tags)
        .bind(&todo.assigned_to)
        .bind(&todo.category)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %todo.id, task = %todo.task, "todo created");
        Ok(todo)
    }

    /// Apply `patch` to the todo with `id` and return the updated row.
    ///
    /// The read and the write share one transaction. Concurrent updates to
    /// the same row are last-write-wins.
    pub async fn update(&self, id: Uuid, patch: TodoPatch) -> StoreResult<TodoRecord> {
        // Take the write lock before reading; a deferred transaction under WAL
        // fails with SQLITE_BUSY_SNAPSHOT instead of waiting on busy_timeout.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let sql = format!("SELECT {TODO_FIELDS} FROM todos WHERE id = ?");
        let mut todo = sqlx::query_as::<_, TodoRecord>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        patch.apply(&mut todo, Utc::now())?;

        sqlx::query(
            "UPDATE todos SET task = ?, completed = ?, priority = ?, description = ?, \
             due_date = ?, tags = ?, assigned_to = ?, category = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&todo.task)
        .bind(todo.completed)
        .bind(todo.priority)
        .bind(&todo.description)
        .bind(todo.due_date)
        .bind(&todo.tags)
        .bind(&todo.assigned_to)
        .bind(&todo.category)
        .bind(todo.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(%id, "todo updated");
        Ok(todo)
    }

    /// Hard delete. Fails with `NotFound` when nothing matched.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::debug!(%id, "todo deleted");
        Ok(())
    }
}
