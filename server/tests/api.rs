use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use todo_server::{app, TodoStore};
use tower::ServiceExt;

const TODO_FIELDS: &str =
    "id task completed priority description dueDate tags assignedTo category createdAt updatedAt";

async fn setup() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = TodoStore::open(dir.path().join("todos.sqlite")).await.unwrap();
    (dir, app(store))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn graphql_request(query: &str, variables: Value) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/api/graphql")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(json!({ "query": query, "variables": variables }).to_string())
        .unwrap()
}

/// Run a GraphQL document and return the whole `{data, errors}` envelope.
async fn execute(app: &Router, query: &str, variables: Value) -> Value {
    let resp = app
        .clone()
        .oneshot(graphql_request(query, variables))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

fn error_message(envelope: &Value) -> &str {
    envelope["errors"][0]["message"].as_str().unwrap()
}

async fn add(app: &Router, variables: Value) -> Value {
    let query = format!(
        "mutation($task: String!, $priority: Int, $description: String, $dueDate: String, \
         $tags: [String!], $assignedTo: String, $category: String) {{ \
         addTodo(task: $task, priority: $priority, description: $description, dueDate: $dueDate, \
         tags: $tags, assignedTo: $assignedTo, category: $category) {{ {TODO_FIELDS} }} }}"
    );
    let envelope = execute(app, &query, variables).await;
    assert!(envelope.get("errors").is_none(), "unexpected errors: {envelope}");
    envelope["data"]["addTodo"].clone()
}

async fn list(app: &Router) -> Vec<Value> {
    let envelope = execute(app, &format!("{{ todos {{ {TODO_FIELDS} }} }}"), json!({})).await;
    envelope["data"]["todos"].as_array().unwrap().clone()
}

// --- pages ---

#[tokio::test]
async fn index_serves_html() {
    let (_dir, app) = setup().await;
    let resp = app
        .oneshot(Request::builder().uri("/").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[http::header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn graphiql_is_served_on_get() {
    let (_dir, app) = setup().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/graphql")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- todos ---

#[tokio::test]
async fn todos_empty() {
    let (_dir, app) = setup().await;
    assert!(list(&app).await.is_empty());
}

// --- addTodo ---

#[tokio::test]
async fn add_todo_with_only_task_fills_defaults() {
    let (_dir, app) = setup().await;
    let todo = add(&app, json!({ "task": "Buy milk" })).await;

    assert_eq!(todo["task"], "Buy milk");
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["priority"], 1);
    assert_eq!(todo["tags"], json!([]));
    assert!(todo["description"].is_null());
    assert!(todo["dueDate"].is_null());
    assert!(todo["assignedTo"].is_null());
    assert!(todo["category"].is_null());
    assert!(uuid::Uuid::parse_str(todo["id"].as_str().unwrap()).is_ok());
    assert!(todo["createdAt"].is_string());
    assert_eq!(todo["createdAt"], todo["updatedAt"]);
}

#[tokio::test]
async fn add_todo_with_every_field() {
    let (_dir, app) = setup().await;
    let todo = add(
        &app,
        json!({
            "task": "Plan trip",
            "priority": 4,
            "description": "summer",
            "dueDate": "2024-07-01",
            "tags": ["travel", "family"],
            "assignedTo": "alex",
            "category": "personal"
        }),
    )
    .await;

    assert_eq!(todo["priority"], 4);
    assert_eq!(todo["description"], "summer");
    assert_eq!(todo["dueDate"], "2024-07-01T00:00:00.000Z");
    assert_eq!(todo["tags"], json!(["travel", "family"]));
    assert_eq!(todo["assignedTo"], "alex");
    assert_eq!(todo["category"], "personal");
}

#[tokio::test]
async fn add_todo_rejects_blank_task() {
    let (_dir, app) = setup().await;
    let envelope = execute(
        &app,
        "mutation { addTodo(task: \"  \") { id } }",
        json!({}),
    )
    .await;
    assert_eq!(error_message(&envelope), "task must not be empty");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn add_todo_missing_task_is_a_graphql_error() {
    let (_dir, app) = setup().await;
    let envelope = execute(&app, "mutation { addTodo(priority: 2) { id } }", json!({})).await;
    assert!(envelope["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

// --- updateTodo ---

#[tokio::test]
async fn update_todo_single_field_leaves_others_unchanged() {
    let (_dir, app) = setup().await;
    let created = add(
        &app,
        json!({ "task": "Walk dog", "description": "park", "tags": ["pets"] }),
    )
    .await;

    let envelope = execute(
        &app,
        &format!("mutation($id: ID!) {{ updateTodo(id: $id, completed: true) {{ {TODO_FIELDS} }} }}"),
        json!({ "id": created["id"] }),
    )
    .await;
    let updated = &envelope["data"]["updateTodo"];

    assert_eq!(updated["completed"], true);
    for field in ["id", "task", "priority", "description", "dueDate", "tags", "assignedTo", "category", "createdAt"] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
    assert!(updated["updatedAt"].as_str().unwrap() > created["updatedAt"].as_str().unwrap());
}

#[tokio::test]
async fn update_todo_explicit_null_clears_nullable_field() {
    let (_dir, app) = setup().await;
    let created = add(&app, json!({ "task": "Call bank", "category": "finance" })).await;

    let envelope = execute(
        &app,
        "mutation($id: ID!) { updateTodo(id: $id, category: null) { category task } }",
        json!({ "id": created["id"] }),
    )
    .await;
    assert!(envelope["data"]["updateTodo"]["category"].is_null());
    assert_eq!(envelope["data"]["updateTodo"]["task"], "Call bank");
}

#[tokio::test]
async fn update_todo_parses_due_date() {
    let (_dir, app) = setup().await;
    let created = add(&app, json!({ "task": "Renew passport" })).await;

    let envelope = execute(
        &app,
        "mutation($id: ID!) { updateTodo(id: $id, dueDate: \"2025-01-15T09:00:00Z\") { dueDate } }",
        json!({ "id": created["id"] }),
    )
    .await;
    assert_eq!(envelope["data"]["updateTodo"]["dueDate"], "2025-01-15T09:00:00.000Z");
}

#[tokio::test]
async fn update_todo_not_found_leaves_store_unchanged() {
    let (_dir, app) = setup().await;
    let created = add(&app, json!({ "task": "Untouched" })).await;
    let before = list(&app).await;

    let envelope = execute(
        &app,
        "mutation { updateTodo(id: \"00000000-0000-0000-0000-000000000000\", task: \"Nope\") { id } }",
        json!({}),
    )
    .await;
    assert_eq!(error_message(&envelope), "Todo not found");
    assert_eq!(list(&app).await, before);
    assert_eq!(before[0]["id"], created["id"]);
}

// --- deleteTodo ---

#[tokio::test]
async fn delete_todo_not_found() {
    let (_dir, app) = setup().await;
    let envelope = execute(
        &app,
        "mutation { deleteTodo(id: \"00000000-0000-0000-0000-000000000000\") }",
        json!({}),
    )
    .await;
    assert_eq!(error_message(&envelope), "Todo not found");
}

#[tokio::test]
async fn delete_todo_with_malformed_id_is_not_found() {
    let (_dir, app) = setup().await;
    let envelope = execute(&app, "mutation { deleteTodo(id: \"abc\") }", json!({})).await;
    assert_eq!(error_message(&envelope), "Todo not found");
}

// --- storage failures ---

#[tokio::test]
async fn closed_store_surfaces_generic_storage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = TodoStore::open(dir.path().join("todos.sqlite")).await.unwrap();
    let app = app(store.clone());
    store.pool().close().await;

    let envelope = execute(&app, "{ todos { id } }", json!({})).await;
    assert_eq!(error_message(&envelope), "storage failure");

    let envelope = execute(&app, "mutation { addTodo(task: \"Lost\") { id } }", json!({})).await;
    assert_eq!(error_message(&envelope), "storage failure");
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let (_dir, app) = setup().await;

    let first = add(&app, json!({ "task": "First" })).await;
    let second = add(&app, json!({ "task": "Second", "tags": ["a", "b", "c"] })).await;

    let todos = list(&app).await;
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["id"], first["id"]);
    assert_eq!(todos[1]["tags"], json!(["a", "b", "c"]));

    let envelope = execute(
        &app,
        "mutation($id: ID!) { updateTodo(id: $id, task: \"Second (edited)\", priority: 5) { task priority tags } }",
        json!({ "id": second["id"] }),
    )
    .await;
    assert_eq!(envelope["data"]["updateTodo"]["task"], "Second (edited)");
    assert_eq!(envelope["data"]["updateTodo"]["priority"], 5);
    assert_eq!(envelope["data"]["updateTodo"]["tags"], json!(["a", "b", "c"]));

    let envelope = execute(
        &app,
        "mutation($id: ID!) { deleteTodo(id: $id) }",
        json!({ "id": first["id"] }),
    )
    .await;
    assert_eq!(envelope["data"]["deleteTodo"], true);

    let todos = list(&app).await;
    assert_eq!(todos.len(), 1);
    assert!(todos.iter().all(|t| t["id"] != first["id"]));

    let envelope = execute(
        &app,
        "mutation($id: ID!) { deleteTodo(id: $id) }",
        json!({ "id": first["id"] }),
    )
    .await;
    assert_eq!(error_message(&envelope), "Todo not found");
}
