//! List view controller: cached todos, the editor form, and user feedback.
//!
//! # Design
//! Follows the same build/parse split as `TodoClient`. Each user action asks
//! the view for an `HttpRequest`, the host executes it, and hands the
//! `HttpResponse` back to the matching `on_*` method. A successful mutation
//! invalidates the cached list; the host re-fetches when `needs_refresh`
//! reports true.

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::form::{Submission, TodoForm};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Todo;

/// Flat error text shown when the list cannot be loaded.
pub const LOAD_ERROR: &str = "Error loading todos.";

#[derive(Debug, Clone)]
pub struct TodoListView {
    client: TodoClient,
    todos: Option<Vec<Todo>>,
    pub form: TodoForm,
    error: Option<String>,
    notification: Option<String>,
}

impl TodoListView {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: None,
            form: TodoForm::default(),
            error: None,
            notification: None,
        }
    }

    /// Cached list, `None` while invalidated or never loaded.
    pub fn todos(&self) -> Option<&[Todo]> {
        self.todos.as_deref()
    }

    pub fn needs_refresh(&self) -> bool {
        self.todos.is_none()
    }

    pub fn invalidate(&mut self) {
        self.todos = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transient notification; reading it clears it.
    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    pub fn refresh_request(&self) -> HttpRequest {
        self.client.build_list_todos()
    }

    pub fn on_refresh(&mut self, response: HttpResponse) -> Result<(), ApiError> {
        match self.client.parse_list_todos(response) {
            Ok(todos) => {
                self.todos = Some(todos);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(LOAD_ERROR.to_string());
                Err(err)
            }
        }
    }

    /// Load the cached todo with `id` into the form. Returns false if the id
    /// is not in the cache.
    pub fn edit(&mut self, id: &str) -> bool {
        let Some(todo) = self.todos.iter().flatten().find(|t| t.id == id) else {
            return false;
        };
        let todo = todo.clone();
        self.form.load(&todo);
        true
    }

    /// Request for the form's current submission: add, or update in edit mode.
    pub fn save_request(&self) -> Result<HttpRequest, ApiError> {
        match self.form.submission() {
            Submission::Add(input) => self.client.build_add_todo(&input),
            Submission::Update { id, input } => self.client.build_update_todo(&id, &input),
        }
    }

    pub fn on_save(&mut self, response: HttpResponse) -> Result<Todo, ApiError> {
        let result = if self.form.is_editing() {
            self.client.parse_update_todo(response)
        } else {
            self.client.parse_add_todo(response)
        };
        match result {
            Ok(todo) => {
                self.invalidate();
                self.form.reset();
                Ok(todo)
            }
            Err(err) => {
                self.notification = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn delete_request(&self, id: &str) -> HttpRequest {
        self.client.build_delete_todo(id)
    }

    /// `id` is the todo passed to `delete_request`. Deleting the todo being
    /// edited also leaves edit mode.
    pub fn on_delete(&mut self, id: &str, response: HttpResponse) -> Result<(), ApiError> {
        match self.client.parse_delete_todo(response) {
            Ok(_) => {
                self.invalidate();
                if self.form.editing() == Some(id) {
                    self.form.reset();
                }
                Ok(())
            }
            Err(err) => {
                self.notification = Some(err.to_string());
                Err(err)
            }
        }
    }
}
