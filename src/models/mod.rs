//! Data models for FormForge.
//!
//! Wire shapes match the browser client: camelCase field attributes, snake_case record columns.

mod field;
mod schema;

pub use field::*;
pub use schema::*;
