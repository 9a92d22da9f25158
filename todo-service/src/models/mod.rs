pub mod todo;

pub use todo::{Todo, TodoUpdate};
