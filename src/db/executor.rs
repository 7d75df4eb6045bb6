//! Query execution
//!
//! Every statement in the service goes through [`execute_query`]. Reads
//! come back as rows, writes as a [`StatusObject`] describing what changed.

use serde::Serialize;
use tracing::{debug, error, instrument};

use super::session::Session;
use crate::query::QueryData;
use crate::{Error, Result};

pub use super::session::Row;

/// Summary of a statement that produced no row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusObject {
    pub message: String,
    pub rows_matched: u64,
    pub warnings: Vec<Row>,
    pub query: String,
    pub data: QueryData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<u64>,
}

/// Result of [`execute_query`]: fetched rows or a write summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    Status(StatusObject),
}

impl QueryOutcome {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryOutcome::Rows(rows) => Some(rows),
            QueryOutcome::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<&StatusObject> {
        match self {
            QueryOutcome::Rows(_) => None,
            QueryOutcome::Status(status) => Some(status),
        }
    }
}

/// Collapse newlines and indentation so queries log and echo on one line.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run `query` with `data` on `session`.
///
/// - `QueryData::None` runs the statement verbatim.
/// - `QueryData::Single` binds one parameter set.
/// - `QueryData::Batch` runs the statement once per parameter set.
///
/// If the statement yields a row set the rows are returned as fetched.
/// Otherwise the write is committed and a status object is returned.
/// Failures are logged and returned as [`Error::Query`].
#[instrument(skip(session, query, data), fields(query = %preview(query)))]
pub async fn execute_query<S>(session: &mut S, query: &str, data: QueryData) -> Result<QueryOutcome>
where
    S: Session + ?Sized,
{
    match run(session, query, data).await {
        Ok(outcome) => Ok(outcome),
        Err(source) => {
            let query = normalize_query(query);
            error!("While executing {}", preview(&query));
            error!("The exception '{}' occurred", source);
            Err(Error::Query { query, source })
        }
    }
}

async fn run<S>(session: &mut S, query: &str, data: QueryData) -> std::result::Result<QueryOutcome, sqlx::Error>
where
    S: Session + ?Sized,
{
    if session.column_count(query).await? > 0 {
        let mut rows = Vec::new();
        for params in data.parameter_sets() {
            rows.extend(session.fetch_rows(query, params).await?);
        }
        debug!(rows = rows.len(), "Fetched rows");
        return Ok(QueryOutcome::Rows(rows));
    }

    let outcome = session.execute_write(query, &data).await?;
    debug!(rows_matched = outcome.rows_affected, "Write committed");

    Ok(QueryOutcome::Status(StatusObject {
        message: "Query OK".to_string(),
        rows_matched: outcome.rows_affected,
        warnings: outcome.warnings,
        query: normalize_query(query),
        data,
        last_insert_id: outcome.last_insert_id,
    }))
}

fn preview(query: &str) -> String {
    normalize_query(query).chars().take(100).collect()
}
