//! SQL generation for report queries.
//!
//! - [`query`] - flat SELECT builder with bind parameters
//! - [`token`] - token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod query;
pub mod token;


pub use dialect::{Dialect, SqlDialect};
pub use query::{BuiltQuery, OrderKey, SelectQuery};
pub use token::{Token, TokenStream};
