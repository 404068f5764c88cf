//! Declarative description of the collections and indexes in the expenses database.
//!
//! - `users`: `{ "email": 1 }` unique
//! - `expenses`: `{ "user_id": 1, "date": -1 }` - a user's expenses, newest first
//! - `expenses`: `{ "user_id": 1, "category": 1 }` - a user's expenses per category
//! - `expenses`: `{ "date": -1 }` - global recency
//!
//! The `_id` index is created by the server with every collection and is not listed.

use crate::models::{Expense, User};
use mongodb::bson::{Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    fn from_bson(value: &Bson) -> Option<Self> {
        let direction = match value {
            Bson::Int32(v) => *v as f64,
            Bson::Int64(v) => *v as f64,
            Bson::Double(v) => *v,
            _ => return None,
        };

        if direction > 0.0 {
            Some(SortOrder::Ascending)
        } else if direction < 0.0 {
            Some(SortOrder::Descending)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    keys: Vec<(String, SortOrder)>,
    unique: bool,
}

impl IndexSpec {
    pub fn on(field: &str, order: SortOrder) -> Self {
        Self {
            keys: vec![(field.to_string(), order)],
            unique: false,
        }
    }

    pub fn then(mut self, field: &str, order: SortOrder) -> Self {
        self.keys.push((field.to_string(), order));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn keys(&self) -> &[(String, SortOrder)] {
        &self.keys
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Same name the server assigns when none is given, e.g. `user_id_1_date_-1`.
    pub fn default_name(&self) -> String {
        self.keys
            .iter()
            .map(|(field, order)| format!("{}_{}", field, order.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn keys_document(&self) -> Document {
        let mut keys = Document::new();
        for (field, order) in &self.keys {
            keys.insert(field.clone(), order.as_i32());
        }
        keys
    }

    pub fn to_index_model(&self) -> IndexModel {
        let options = if self.unique {
            Some(IndexOptions::builder().unique(true).build())
        } else {
            None
        };

        IndexModel::builder()
            .keys(self.keys_document())
            .options(options)
            .build()
    }

    /// Reads back an index listed by the server. Fails on non-directional keys (text, 2dsphere, ...).
    pub fn from_index_model(model: &IndexModel) -> Result<Self, String> {
        let mut keys = Vec::with_capacity(model.keys.len());
        for (field, value) in model.keys.iter() {
            let order = SortOrder::from_bson(value)
                .ok_or_else(|| format!("unsupported key {}: {}", field, value))?;
            keys.push((field.clone(), order));
        }

        if keys.is_empty() {
            return Err("index without keys".to_string());
        }

        let unique = model
            .options
            .as_ref()
            .and_then(|options| options.unique)
            .unwrap_or(false);

        Ok(Self { keys, unique })
    }

    pub fn is_primary_key(&self) -> bool {
        self.keys.len() == 1 && self.keys[0].0 == "_id"
    }
}

/// Converts the indexes listed by the server, skipping the ones without directional keys.
pub fn directional_indexes(collection: &str, models: &[IndexModel]) -> Vec<IndexSpec> {
    models
        .iter()
        .filter_map(|model| match IndexSpec::from_index_model(model) {
            Ok(spec) => Some(spec),
            Err(reason) => {
                log::debug!("   ℹ️  Skipping index on {}: {}", collection, reason);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CollectionLayout {
    pub name: &'static str,
    pub indexes: Vec<IndexSpec>,
}

/// Collections in creation order, each with its indexes in creation order.
pub fn expected_layout() -> Vec<CollectionLayout> {
    vec![
        CollectionLayout {
            name: User::COLLECTION,
            indexes: vec![IndexSpec::on(User::EMAIL, SortOrder::Ascending).unique()],
        },
        CollectionLayout {
            name: Expense::COLLECTION,
            indexes: vec![
                IndexSpec::on(Expense::USER_ID, SortOrder::Ascending)
                    .then(Expense::DATE, SortOrder::Descending),
                IndexSpec::on(Expense::USER_ID, SortOrder::Ascending)
                    .then(Expense::CATEGORY, SortOrder::Ascending),
                IndexSpec::on(Expense::DATE, SortOrder::Descending),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_expected_layout_order() {
        let layout = expected_layout();
        let names: Vec<_> = layout.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["users", "expenses"]);

        let users = &layout[0].indexes;
        assert_eq!(users.len(), 1);
        assert!(users[0].is_unique());
        assert_eq!(users[0].keys_document(), doc! { "email": 1 });

        let expenses: Vec<_> = layout[1].indexes.iter().map(|i| i.keys_document()).collect();
        assert_eq!(
            expenses,
            vec![
                doc! { "user_id": 1, "date": -1 },
                doc! { "user_id": 1, "category": 1 },
                doc! { "date": -1 },
            ]
        );
        assert!(layout[1].indexes.iter().all(|i| !i.is_unique()));
    }

    #[test]
    fn test_default_names() {
        let names: Vec<_> = expected_layout()
            .iter()
            .flat_map(|c| c.indexes.iter().map(|i| i.default_name()))
            .collect();
        assert_eq!(
            names,
            vec!["email_1", "user_id_1_date_-1", "user_id_1_category_1", "date_-1"]
        );
    }

    #[test]
    fn test_index_model_options() {
        let unique = IndexSpec::on("email", SortOrder::Ascending).unique().to_index_model();
        assert_eq!(unique.options.and_then(|o| o.unique), Some(true));

        let plain = IndexSpec::on("date", SortOrder::Descending).to_index_model();
        assert!(plain.options.is_none());
    }

    #[test]
    fn test_from_index_model_accepts_any_numeric_width() {
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1_i64, "date": -1.0 })
            .build();

        let spec = IndexSpec::from_index_model(&model).unwrap();
        assert_eq!(
            spec,
            IndexSpec::on("user_id", SortOrder::Ascending).then("date", SortOrder::Descending)
        );
    }

    #[test]
    fn test_from_index_model_rejects_text_index() {
        let model = IndexModel::builder()
            .keys(doc! { "description": "text" })
            .build();

        assert!(IndexSpec::from_index_model(&model).is_err());
    }

    #[test]
    fn test_directional_indexes_skips_text_and_hashed() {
        let models = vec![
            IndexModel::builder().keys(doc! { "_id": 1 }).build(),
            IndexModel::builder().keys(doc! { "description": "text" }).build(),
            IndexModel::builder().keys(doc! { "user_id": "hashed" }).build(),
            IndexModel::builder().keys(doc! { "date": -1 }).build(),
        ];

        let specs = directional_indexes("expenses", &models);

        assert_eq!(
            specs,
            vec![
                IndexSpec::on("_id", SortOrder::Ascending),
                IndexSpec::on("date", SortOrder::Descending),
            ]
        );
    }

    #[test]
    fn test_primary_key_detection() {
        assert!(IndexSpec::on("_id", SortOrder::Ascending).is_primary_key());
        assert!(!IndexSpec::on("email", SortOrder::Ascending).is_primary_key());
    }
}
