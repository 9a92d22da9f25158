use serde::{Deserialize, Serialize};

/// A stored todo item.
///
/// `id` is the client-supplied identifier and is what every lookup matches
/// on. MongoDB's own `_id` is left to the driver and never surfaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub checked: bool,
}

/// The fields an update is allowed to overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub text: String,
    pub checked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};

    #[test]
    fn decodes_documents_carrying_native_object_id() {
        let document = doc! {
            "_id": ObjectId::new(),
            "id": 7_i64,
            "text": "buy milk",
            "checked": true,
        };

        let todo: Todo = mongodb::bson::from_document(document).unwrap();
        assert_eq!(
            todo,
            Todo {
                id: 7,
                text: "buy milk".to_string(),
                checked: true,
            }
        );
    }

    #[test]
    fn default_is_the_zero_todo() {
        let value = serde_json::to_value(Todo::default()).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 0, "text": "", "checked": false }));
    }
}
