use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Todo, TodoUpdate};

/// Request body accepted by create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TodoPayload {
    pub id: Option<i64>,
    #[validate(
        required(message = "text is required"),
        length(min = 1, message = "text must not be empty")
    )]
    pub text: Option<String>,
    #[validate(required(message = "checked is required"))]
    pub checked: Option<bool>,
}

impl TodoPayload {
    /// Missing fields fall back to their zero values; call after validation.
    pub fn into_todo(self) -> Todo {
        Todo {
            id: self.id.unwrap_or_default(),
            text: self.text.unwrap_or_default(),
            checked: self.checked.unwrap_or_default(),
        }
    }

    /// Only `text` and `checked` are written on update; a body `id` is ignored.
    pub fn into_update(self) -> TodoUpdate {
        TodoUpdate {
            text: self.text.unwrap_or_default(),
            checked: self.checked.unwrap_or_default(),
        }
    }
}

/// Result of an insert. The `InsertedID` key is what existing clients
/// parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedTodo {
    #[serde(rename = "InsertedID")]
    pub inserted_id: String,
}
