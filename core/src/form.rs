//! Form state behind the todo editor.
//!
//! All fields are the raw text the user typed. `submission` turns them into
//! the input for `addTodo` or, in edit mode, `updateTodo`.

use crate::types::{AddTodo, Todo, UpdateTodo};

pub const DEFAULT_PRIORITY: i32 = 1;

/// What the form produces when submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Add(AddTodo),
    Update { id: String, input: UpdateTodo },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoForm {
    pub task: String,
    pub priority: i32,
    pub description: String,
    pub due_date: String,
    /// Comma-separated tags.
    pub tags: String,
    pub assigned_to: String,
    pub category: String,
    editing: Option<String>,
}

impl Default for TodoForm {
    fn default() -> Self {
        Self {
            task: String::new(),
            priority: DEFAULT_PRIORITY,
            description: String::new(),
            due_date: String::new(),
            tags: String::new(),
            assigned_to: String::new(),
            category: String::new(),
            editing: None,
        }
    }
}

impl TodoForm {
    /// Id of the todo being edited, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Enter edit mode for `todo`.
    pub fn load(&mut self, todo: &Todo) {
        *self = Self {
            task: todo.task.clone(),
            priority: todo.priority,
            description: todo.description.clone().unwrap_or_default(),
            due_date: todo.due_date.clone().unwrap_or_default(),
            tags: join_tags(&todo.tags),
            assigned_to: todo.assigned_to.clone().unwrap_or_default(),
            category: todo.category.clone().unwrap_or_default(),
            editing: Some(todo.id.clone()),
        };
    }

    /// Back to an empty form in add mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn submission(&self) -> Submission {
        match &self.editing {
            None => Submission::Add(AddTodo {
                task: self.task.clone(),
                priority: Some(self.priority),
                description: non_empty(&self.description),
                due_date: non_empty(&self.due_date),
                tags: Some(parse_tags(&self.tags)),
                assigned_to: non_empty(&self.assigned_to),
                category: non_empty(&self.category),
            }),
            // Every form field is sent; blank text fields clear the value.
            Some(id) => Submission::Update {
                id: id.clone(),
                input: UpdateTodo {
                    task: Some(self.task.clone()),
                    completed: None,
                    priority: Some(self.priority),
                    description: Some(non_empty(&self.description)),
                    due_date: Some(non_empty(&self.due_date)),
                    tags: Some(parse_tags(&self.tags)),
                    assigned_to: Some(non_empty(&self.assigned_to)),
                    category: Some(non_empty(&self.category)),
                },
            },
        }
    }
}

/// Split comma-separated input into tags, trimming and dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
