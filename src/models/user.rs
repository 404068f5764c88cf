use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Account document stored in `users`. `email` is unique across the collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password: String, // bcrypt hash, never plaintext
}

impl User {
    pub const COLLECTION: &'static str = "users";
    pub const EMAIL: &'static str = "email";

    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            password: password_hash.into(),
        }
    }
}
