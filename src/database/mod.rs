use crate::config::Config;
use crate::schema::{directional_indexes, CollectionStatus, IndexSpec, SchemaTarget};
use crate::utils::{BootstrapError, INDEX_KEY_SPECS_CONFLICT, INDEX_OPTIONS_CONFLICT, NAMESPACE_EXISTS};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

pub const APP_NAME: &str = "expenses-db-init";

/// Owned connection to the target database. Passed explicitly to every bootstrap step.
#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Connects and pings the server, so an unreachable database fails before any schema change.
    pub async fn connect(config: &Config) -> Result<Self, BootstrapError> {
        let mut client_options = ClientOptions::parse(&config.mongo_uri)
            .await
            .map_err(|e| BootstrapError::Config(format!("invalid MONGO_URI: {}", e)))?;

        // One sequential caller
        client_options.app_name = Some(APP_NAME.to_string());
        client_options.max_pool_size = Some(2);
        client_options.min_pool_size = Some(0);

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)
            .map_err(|e| BootstrapError::Connection(e.to_string()))?;

        let db = client.database(&config.database_name);

        // Test connection
        db.list_collection_names()
            .await
            .map_err(|e| BootstrapError::Connection(e.to_string()))?;

        Ok(Self { client, db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes pooled connections. The handle must not be used afterwards.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Server error code carried by a command failure, if any.
pub fn server_code(err: &MongoError) -> Option<i32> {
    match *err.kind {
        ErrorKind::Command(ref command) => Some(command.code),
        _ => None,
    }
}

#[async_trait]
impl SchemaTarget for MongoDB {
    fn database_name(&self) -> &str {
        self.db.name()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, BootstrapError> {
        self.db
            .list_collection_names()
            .await
            .map_err(|e| BootstrapError::database("listCollections", e))
    }

    async fn create_collection(&self, name: &str) -> Result<CollectionStatus, BootstrapError> {
        match self.db.create_collection(name).await {
            Ok(()) => Ok(CollectionStatus::Created),
            Err(e) if server_code(&e) == Some(NAMESPACE_EXISTS) => Ok(CollectionStatus::Existing),
            Err(e) => Err(BootstrapError::database(format!("createCollection({})", name), e)),
        }
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, BootstrapError> {
        log::debug!(
            "   createIndex {} on {} ({} keys)",
            index.default_name(),
            collection,
            index.keys().len()
        );

        let result = self
            .collection::<mongodb::bson::Document>(collection)
            .create_index(index.to_index_model())
            .await;

        match result {
            Ok(created) => Ok(created.index_name),
            Err(e)
                if matches!(
                    server_code(&e),
                    Some(INDEX_OPTIONS_CONFLICT) | Some(INDEX_KEY_SPECS_CONFLICT)
                ) =>
            {
                Err(BootstrapError::IndexConflict {
                    collection: collection.to_string(),
                    index: index.default_name(),
                    message: e.to_string(),
                })
            }
            Err(e) => Err(BootstrapError::database(format!("createIndex({})", collection), e)),
        }
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexSpec>, BootstrapError> {
        let operation = format!("listIndexes({})", collection);
        let models: Vec<IndexModel> = self
            .collection::<mongodb::bson::Document>(collection)
            .list_indexes()
            .await
            .map_err(|e| BootstrapError::database(operation.clone(), e))?
            .try_collect()
            .await
            .map_err(|e| BootstrapError::database(operation, e))?;

        Ok(directional_indexes(collection, &models))
    }
}
