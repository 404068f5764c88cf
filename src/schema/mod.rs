pub mod layout;

pub use layout::*;

use crate::utils::BootstrapError;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Created,
    Existing,
}

/// Administrative primitives the bootstrap needs from a database.
///
/// Implementations own their connection; callers pass them explicitly into
/// [`bootstrap`] and [`verify`].
#[async_trait]
pub trait SchemaTarget: Send + Sync {
    fn database_name(&self) -> &str;

    async fn list_collection_names(&self) -> Result<Vec<String>, BootstrapError>;

    /// Creates the collection, or reports it as `Existing` if it is already there.
    async fn create_collection(&self, name: &str) -> Result<CollectionStatus, BootstrapError>;

    /// Ensures the index exists and returns its name. An identical existing index is a no-op,
    /// a conflicting one is `BootstrapError::IndexConflict`.
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, BootstrapError>;

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexSpec>, BootstrapError>;
}

#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub collections: Vec<(String, CollectionStatus)>,
    pub indexes: Vec<(String, String)>,
}

impl BootstrapReport {
    pub fn created_collections(&self) -> usize {
        self.collections
            .iter()
            .filter(|(_, status)| *status == CollectionStatus::Created)
            .count()
    }
}

/// Creates the collections, then their indexes, in declaration order. Stops at the first error.
pub async fn bootstrap<T: SchemaTarget + ?Sized>(target: &T) -> Result<BootstrapReport, BootstrapError> {
    let layout = expected_layout();
    let mut report = BootstrapReport::default();

    log::info!("🗄️  Initializing database: {}", target.database_name());

    for collection in &layout {
        let status = target.create_collection(collection.name).await?;
        match status {
            CollectionStatus::Created => log::info!("   ✅ Collection created: {}", collection.name),
            CollectionStatus::Existing => log::debug!("   ℹ️  Collection already exists: {}", collection.name),
        }
        report.collections.push((collection.name.to_string(), status));
    }

    log::info!("🔧 Creating database indexes...");

    for collection in &layout {
        for index in &collection.indexes {
            let name = target.create_index(collection.name, index).await?;
            let unique = if index.is_unique() { " [unique]" } else { "" };
            log::info!("   ✅ Index ready: {}({}){}", collection.name, name, unique);
            report.indexes.push((collection.name.to_string(), name));
        }
    }

    log::info!("✅ Database indexes ready");

    Ok(report)
}

/// Checks that every collection exists and carries the expected indexes.
///
/// Only missing or conflicting (same keys, different options) indexes fail. Indexes this
/// tool does not own are left alone and logged.
pub async fn verify<T: SchemaTarget + ?Sized>(target: &T) -> Result<(), BootstrapError> {
    let existing = target.list_collection_names().await?;

    for collection in expected_layout() {
        if !existing.iter().any(|name| name == collection.name) {
            return Err(BootstrapError::LayoutMismatch {
                collection: collection.name.to_string(),
                message: "collection is missing".to_string(),
            });
        }

        let indexes: Vec<IndexSpec> = target
            .list_indexes(collection.name)
            .await?
            .into_iter()
            .filter(|index| !index.is_primary_key())
            .collect();

        for expected in &collection.indexes {
            if indexes.contains(expected) {
                continue;
            }
            let message = match indexes.iter().find(|found| found.keys() == expected.keys()) {
                Some(_) => format!("conflicting index: {}", expected.default_name()),
                None => format!("missing index: {}", expected.default_name()),
            };
            return Err(BootstrapError::LayoutMismatch {
                collection: collection.name.to_string(),
                message,
            });
        }

        for found in indexes.iter().filter(|found| !collection.indexes.contains(found)) {
            log::warn!(
                "   ⚠️  Unmanaged index on {}: {}",
                collection.name,
                found.default_name()
            );
        }

        log::debug!("   ✅ Layout verified: {} ({} indexes)", collection.name, indexes.len());
    }

    Ok(())
}
