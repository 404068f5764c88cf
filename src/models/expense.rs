use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Health,
}

/// Expense document stored in `expenses`, owned by a user through `user_id`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Expense {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub amount: f64,
    pub category: Category,
    pub description: Option<String>,
    pub date: BsonDateTime,
}

impl Expense {
    pub const COLLECTION: &'static str = "expenses";
    pub const USER_ID: &'static str = "user_id";
    pub const DATE: &'static str = "date";
    pub const CATEGORY: &'static str = "category";
}
