//! Data layer
//!
//! - `sql`: dialect abstraction and the quoting gateway
//! - `filters`: filter model, field resolution and predicate compilation
//! - `results`: visibility scoping, pagination and grouped counts
//! - `sqlite`: schema of the tables the query core reads
//! - `types`: row types returned to callers

pub mod error;
pub mod filters;
pub mod results;
pub mod sql;
pub mod sqlite;
pub mod types;
