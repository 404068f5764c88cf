//! Provisions the `expenses_db` MongoDB database: the `users` and `expenses`
//! collections and their indexes.

pub mod config;
pub mod database;
pub mod models;
pub mod schema;
pub mod status;
pub mod utils;
