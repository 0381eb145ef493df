//! Client core for the todo tracker.
//!
//! # Overview
//! Builds GraphQL `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern), and models the
//! editor form and list view on top of that.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only the endpoint URL.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - `TodoListView` owns the cached list and the form; mutations invalidate
//!   the cache and the host re-fetches.
//! - DTOs are defined independently from the server crate; the live
//!   integration test catches schema drift.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use error::ApiError;
pub use form::{parse_tags, Submission, TodoForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{AddTodo, Todo, UpdateTodo};
pub use view::TodoListView;
