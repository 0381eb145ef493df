//! Stateless GraphQL request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the endpoint URL. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. User input always travels as GraphQL
//! variables, never spliced into the document text.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{AddTodo, Todo, UpdateTodo};

/// Path of the GraphQL endpoint relative to the server root.
pub const GRAPHQL_PATH: &str = "/api/graphql";

/// Selection set requested for every returned todo.
pub const TODO_FIELDS: &str =
    "id task completed priority description dueDate tags assignedTo category createdAt updatedAt";

/// Declared GraphQL type of each `updateTodo` argument.
const UPDATE_ARG_TYPES: &[(&str, &str)] = &[
    ("task", "String"),
    ("completed", "Boolean"),
    ("priority", "Int"),
    ("description", "String"),
    ("dueDate", "String"),
    ("tags", "[String!]"),
    ("assignedTo", "String"),
    ("category", "String"),
];

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

/// Synchronous, stateless client for the todo GraphQL API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    endpoint: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}{GRAPHQL_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        let query = format!("query Todos {{ todos {{ {TODO_FIELDS} }} }}");
        self.request(&query, Value::Object(Map::new()))
    }

    pub fn build_add_todo(&self, input: &AddTodo) -> Result<HttpRequest, ApiError> {
        let query = format!(
            "mutation AddTodo($task: String!, $priority: Int, $description: String, \
             $dueDate: String, $tags: [String!], $assignedTo: String, $category: String) {{ \
             addTodo(task: $task, priority: $priority, description: $description, \
             dueDate: $dueDate, tags: $tags, assignedTo: $assignedTo, category: $category) \
             {{ {TODO_FIELDS} }} }}"
        );
        let variables =
            serde_json::to_value(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(&query, variables))
    }

    /// Only the fields present in `input` are declared and passed, so absent
    /// fields stay untouched on the server.
    pub fn build_update_todo(&self, id: &str, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let mut variables = match serde_json::to_value(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?
        {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::SerializationError(format!(
                    "expected an object, got {other}"
                )))
            }
        };

        let mut params = vec!["$id: ID!".to_string()];
        let mut args = vec!["id: $id".to_string()];
        for (name, ty) in UPDATE_ARG_TYPES {
            if variables.contains_key(*name) {
                params.push(format!("${name}: {ty}"));
                args.push(format!("{name}: ${name}"));
            }
        }
        variables.insert("id".to_string(), Value::String(id.to_string()));

        let query = format!(
            "mutation UpdateTodo({}) {{ updateTodo({}) {{ {TODO_FIELDS} }} }}",
            params.join(", "),
            args.join(", ")
        );
        Ok(self.request(&query, Value::Object(variables)))
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        self.request(
            "mutation DeleteTodo($id: ID!) { deleteTodo(id: $id) }",
            json!({ "id": id }),
        )
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_field(response, "todos")
    }

    pub fn parse_add_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_field(response, "addTodo")
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_field(response, "updateTodo")
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<bool, ApiError> {
        parse_field(response, "deleteTodo")
    }

    fn request(&self, query: &str, variables: Value) -> HttpRequest {
        let body = json!({ "query": query, "variables": variables }).to_string();
        HttpRequest::post_json(self.endpoint.clone(), body)
    }
}

/// Check the status, surface GraphQL errors, then decode `data.<field>`.
fn parse_field<T: DeserializeOwned>(response: HttpResponse, field: &str) -> Result<T, ApiError> {
    if response.status != 200 {
        return Err(ApiError::HttpError {
            status: response.status,
            body: response.body,
        });
    }
    let envelope: Envelope = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if !envelope.errors.is_empty() {
        return Err(ApiError::from_messages(
            envelope.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    let value = envelope
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .ok_or_else(|| ApiError::DeserializationError(format!("missing data.{field}")))?;
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
