pub mod expense;
pub mod user;

pub use expense::*;
pub use user::*;
