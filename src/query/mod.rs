//! Query building for Health Dome
//!
//! Turns client input (filter tokens, update payloads) into parameterized
//! SQL. Column names never reach the SQL text without passing the table's
//! allow-list; values are always bound.

pub mod filter;
pub mod statement;
pub mod value;

pub use filter::{Condition, Filters};
pub use statement::{insert_sql, select, Statement, UpdateStatement};
pub use value::{QueryData, SqlValue};
