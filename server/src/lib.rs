//! HTTP surface of the todo tracker.
//!
//! - `POST /api/graphql` executes a GraphQL request and returns the
//!   `{ data, errors }` envelope.
//! - `GET /api/graphql` serves GraphiQL.
//! - `GET /` serves the browser page.

pub mod config;
pub mod error;
pub mod model;
pub mod schema;
pub mod store;

use async_graphql::http::GraphiQLSource;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use model::{NewTodo, Patch, TodoPatch, TodoRecord};
pub use schema::{build_schema, TodoObject, TodoSchema};
pub use store::TodoStore;

pub const GRAPHQL_PATH: &str = "/api/graphql";

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn app(store: TodoStore) -> Router {
    let schema = build_schema(store);
    Router::new()
        .route("/", get(index))
        .route(GRAPHQL_PATH, get(graphiql).post(graphql))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn graphql(
    State(schema): State<TodoSchema>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request).await)
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
