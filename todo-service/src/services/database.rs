use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use mongodb::{
    bson::{doc, Bson, Document},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Duration;

use super::{with_timeout, TodoRepository, NO_DOCUMENTS};
use crate::dtos::InsertedTodo;
use crate::models::{Todo, TodoUpdate};

#[derive(Clone)]
pub struct MongoTodoRepository {
    client: MongoClient,
    collection: Collection<Todo>,
    timeout: Duration,
}

impl MongoTodoRepository {
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, collection = %collection, "Connected to MongoDB database");
        Ok(Self::new(client, &db, collection, timeout))
    }

    pub fn new(client: MongoClient, db: &Database, collection: &str, timeout: Duration) -> Self {
        Self {
            client,
            collection: db.collection(collection),
            timeout,
        }
    }

    /// Lookups go through the client-supplied `id`, so it gets its own
    /// index. It is not unique: the API never enforced that.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().name("id_idx".to_string()).build())
            .build();

        self.collection
            .create_index(id_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create id index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Todo indexes initialized");
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    async fn insert(&self, todo: &Todo) -> Result<InsertedTodo, AppError> {
        let result = with_timeout(
            "insert",
            self.timeout,
            self.collection.insert_one(todo, None),
        )
        .await?;

        let inserted_id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        Ok(InsertedTodo { inserted_id })
    }

    async fn find_by_id(&self, id: i64) -> Result<Todo, AppError> {
        with_timeout(
            "find_by_id",
            self.timeout,
            self.collection.find_one(doc! { "id": id }, None),
        )
        .await?
        .ok_or_else(|| AppError::DatabaseError(anyhow::anyhow!(NO_DOCUMENTS)))
    }

    async fn update_by_id(&self, id: i64, update: &TodoUpdate) -> Result<u64, AppError> {
        let changes = doc! {
            "$set": {
                "text": &update.text,
                "checked": update.checked,
            }
        };

        let result = with_timeout(
            "update_by_id",
            self.timeout,
            self.collection.update_one(doc! { "id": id }, changes, None),
        )
        .await?;
        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError> {
        let result = with_timeout(
            "delete_by_id",
            self.timeout,
            self.collection.delete_one(doc! { "id": id }, None),
        )
        .await?;
        Ok(result.deleted_count)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        let raw = self.collection.clone_with_type::<Document>();
        with_timeout("find_all", self.timeout, async {
            let cursor = raw.find(doc! {}, None).await?;
            decode_todos(cursor).await
        })
        .await
    }

    async fn ping(&self) -> Result<(), AppError> {
        with_timeout(
            "ping",
            self.timeout,
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 }, None),
        )
        .await
        .map_err(|e| {
            tracing::error!("MongoDB health check failed: {}", e);
            e
        })?;
        Ok(())
    }
}

/// Decodes documents in cursor order, stopping at the first one that is
/// not a valid todo. Nothing after it is read.
async fn decode_todos<S>(mut documents: S) -> Result<Vec<Todo>, AppError>
where
    S: Stream<Item = Result<Document, mongodb::error::Error>> + Unpin,
{
    let mut todos = Vec::new();
    while let Some(document) = documents.try_next().await? {
        let todo = mongodb::bson::from_document(document).map_err(|e| {
            tracing::error!("Failed to decode todo document: {}", e);
            AppError::DatabaseError(anyhow::Error::new(e))
        })?;
        todos.push(todo);
    }
    Ok(todos)
}
