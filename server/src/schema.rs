//! GraphQL schema: one query (`todos`) and three mutations.
//!
//! Each resolver forwards to [`TodoStore`] after filling defaults and
//! parsing `dueDate`. There is no access control; any caller may mutate any
//! record.

use async_graphql::{
    Context, EmptySubscription, MaybeUndefined, Object, Result, Schema, SimpleObject, ID,
};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{
    format_timestamp, parse_due_date, NewTodo, Patch, TodoPatch, TodoRecord, DEFAULT_PRIORITY,
};
use crate::store::TodoStore;

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(store: TodoStore) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

/// A todo as exposed over GraphQL. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Todo")]
pub struct TodoObject {
    pub id: ID,
    pub task: String,
    pub completed: bool,
    pub priority: i32,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<String>,
    pub assigned_to: Option<String>,
    pub category: Option<String>,
}

impl From<TodoRecord> for TodoObject {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: ID(record.id.to_string()),
            task: record.task,
            completed: record.completed,
            priority: record.priority,
            description: record.description,
            due_date: record.due_date.as_ref().map(format_timestamp),
            created_at: format_timestamp(&record.created_at),
            updated_at: format_timestamp(&record.updated_at),
            tags: record.tags.0,
            assigned_to: record.assigned_to,
            category: record.category,
        }
    }
}

/// An id that is not a UUID cannot match any row.
fn parse_id(id: &ID) -> Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| StoreError::NotFound.into_graphql())
}

/// Empty strings and explicit nulls both clear the due date.
fn due_date_patch(input: MaybeUndefined<String>) -> Result<Patch<chrono::DateTime<chrono::Utc>>> {
    match input {
        MaybeUndefined::Undefined => Ok(Patch::Keep),
        MaybeUndefined::Null => Ok(Patch::Clear),
        MaybeUndefined::Value(raw) => match parse_due_date(&raw).map_err(StoreError::into_graphql)? {
            Some(ts) => Ok(Patch::Set(ts)),
            None => Ok(Patch::Clear),
        },
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<TodoObject>> {
        let store = ctx.data::<TodoStore>()?;
        let todos = store.list().await.map_err(StoreError::into_graphql)?;
        Ok(todos.into_iter().map(TodoObject::from).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[allow(clippy::too_many_arguments)]
    async fn add_todo(
        &self,
        ctx: &Context<'_>,
        task: String,
        priority: Option<i32>,
        description: Option<String>,
        due_date: Option<String>,
        tags: Option<Vec<String>>,
        assigned_to: Option<String>,
        category: Option<String>,
    ) -> Result<TodoObject> {
        let store = ctx.data::<TodoStore>()?;
        let due_date = match due_date {
            Some(raw) => parse_due_date(&raw).map_err(StoreError::into_graphql)?,
            None => None,
        };
        let input = NewTodo {
            task,
            priority: priority.unwrap_or(DEFAULT_PRIORITY),
            description,
            due_date,
            tags: tags.unwrap_or_default(),
            assigned_to,
            category,
        };
        let todo = store.insert(input).await.map_err(StoreError::into_graphql)?;
        Ok(todo.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_todo(
        &self,
        ctx: &Context<'_>,
        id: ID,
        task: Option<String>,
        completed: Option<bool>,
        priority: Option<i32>,
        description: MaybeUndefined<String>,
        due_date: MaybeUndefined<String>,
        tags: Option<Vec<String>>,
        assigned_to: MaybeUndefined<String>,
        category: MaybeUndefined<String>,
    ) -> Result<TodoObject> {
        let store = ctx.data::<TodoStore>()?;
        let id = parse_id(&id)?;
        let patch = TodoPatch {
            task,
            completed,
            priority,
            description: description.into(),
            due_date: due_date_patch(due_date)?,
            tags,
            assigned_to: assigned_to.into(),
            category: category.into(),
        };
        let todo = store
            .update(id, patch)
            .await
            .map_err(StoreError::into_graphql)?;
        Ok(todo.into())
    }

    async fn delete_todo(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let store = ctx.data::<TodoStore>()?;
        let id = parse_id(&id)?;
        store.delete(id).await.map_err(StoreError::into_graphql)?;
        Ok(true)
    }
}
