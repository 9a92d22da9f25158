pub mod validation;

pub use validation::{parse_todo_id, TodoId, ValidatedTodo, ValidationPolicy};
