//! Todo record, creation input and partial-update patch.
//!
//! # Design
//! `TodoPatch` is applied in memory against the current row, then the whole
//! row is written back. Nullable columns use `Patch<T>` so that "leave as is"
//! and "set to null" stay distinguishable.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

pub const DEFAULT_PRIORITY: i32 = 1;

/// A single row of the `todos` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TodoRecord {
    pub id: Uuid,
    pub task: String,
    pub completed: bool,
    pub priority: i32,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Json<Vec<String>>,
    pub assigned_to: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a todo. Everything except `task` has a default.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub task: String,
    pub priority: i32,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub assigned_to: Option<String>,
    pub category: Option<String>,
}

impl NewTodo {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            priority: DEFAULT_PRIORITY,
            description: None,
            due_date: None,
            tags: Vec::new(),
            assigned_to: None,
            category: None,
        }
    }

    /// Build the row for this input with a fresh id and timestamps.
    pub fn into_record(self, now: DateTime<Utc>) -> StoreResult<TodoRecord> {
        validate_task(&self.task)?;
        Ok(TodoRecord {
            id: Uuid::new_v4(),
            task: self.task,
            completed: false,
            priority: self.priority,
            description: self.description,
            due_date: self.due_date,
            tags: Json(self.tags),
            assigned_to: self.assigned_to,
            category: self.category,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Update of a nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(value) => *slot = Some(value),
        }
    }
}

impl<T> From<async_graphql::MaybeUndefined<T>> for Patch<T> {
    fn from(value: async_graphql::MaybeUndefined<T>) -> Self {
        match value {
            async_graphql::MaybeUndefined::Undefined => Patch::Keep,
            async_graphql::MaybeUndefined::Null => Patch::Clear,
            async_graphql::MaybeUndefined::Value(v) => Patch::Set(v),
        }
    }
}

/// Partial update. Only the fields that are not `None`/`Keep` change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<i32>,
    pub description: Patch<String>,
    pub due_date: Patch<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub assigned_to: Patch<String>,
    pub category: Patch<String>,
}

impl TodoPatch {
    /// Apply onto `record` and refresh `updated_at`.
    ///
    /// `updated_at` always moves forward by at least one millisecond, the
    /// precision at which timestamps are sent to clients.
    pub fn apply(self, record: &mut TodoRecord, now: DateTime<Utc>) -> StoreResult<()> {
        if let Some(task) = self.task {
            validate_task(&task)?;
            record.task = task;
        }
        if let Some(completed) = self.completed {
            record.completed = completed;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
        self.description.apply_to(&mut record.description);
        self.due_date.apply_to(&mut record.due_date);
        if let Some(tags) = self.tags {
            record.tags = Json(tags);
        }
        self.assigned_to.apply_to(&mut record.assigned_to);
        self.category.apply_to(&mut record.category);

        record.updated_at = now.max(record.updated_at + Duration::milliseconds(1));
        Ok(())
    }
}

fn validate_task(task: &str) -> StoreResult<()> {
    if task.trim().is_empty() {
        return Err(StoreError::Validation("task must not be empty".to_string()));
    }
    Ok(())
}

/// Parse a due date as sent by clients.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
/// An empty string means no due date.
pub fn parse_due_date(input: &str) -> StoreResult<Option<DateTime<Utc>>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()));
    }
    Err(StoreError::Validation(format!("invalid dueDate: {input}")))
}

/// Wire format for timestamps: RFC 3339, millisecond precision, `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
