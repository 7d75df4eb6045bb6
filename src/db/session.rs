//! The connection seam the executor runs on.
//!
//! [`Session`] is implemented for a live MySQL connection; tests substitute
//! a mock so the executor contract can be checked without a server.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Connection as _, Executor as _, MySql, Row as _, Statement as _, TypeInfo as _, ValueRef as _};
use tracing::warn;

use crate::query::{QueryData, SqlValue};

/// A fetched row, one JSON value per column in select order.
pub type Row = Vec<Value>;

/// What the engine reports back after a write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
    pub last_insert_id: Option<u64>,
    pub warnings: Vec<Row>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Session: Send {
    /// Number of columns the statement yields; zero for statements that
    /// produce no row set.
    async fn column_count(&mut self, sql: &str) -> Result<usize, sqlx::Error>;

    /// Run a row-returning statement once. Empty `params` runs it verbatim.
    async fn fetch_rows(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error>;

    /// Run a statement once per parameter set inside one transaction and
    /// commit it. `warnings` comes from `SHOW WARNINGS`, so for a batch it
    /// only covers the last parameter set.
    async fn execute_write(&mut self, sql: &str, data: &QueryData) -> Result<WriteOutcome, sqlx::Error>;
}

#[async_trait]
impl Session for MySqlConnection {
    async fn column_count(&mut self, sql: &str) -> Result<usize, sqlx::Error> {
        let statement = (&mut *self).prepare(sql).await?;
        Ok(statement.columns().len())
    }

    async fn fetch_rows(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error> {
        let rows = if params.is_empty() {
            (&mut *self).fetch_all(sql).await?
        } else {
            bind_all(sqlx::query(sql), params).fetch_all(&mut *self).await?
        };
        rows.iter().map(decode_row).collect()
    }

    async fn execute_write(&mut self, sql: &str, data: &QueryData) -> Result<WriteOutcome, sqlx::Error> {
        let mut tx = self.begin().await?;
        let mut outcome = WriteOutcome::default();

        for params in data.parameter_sets() {
            let result = if params.is_empty() {
                (&mut *tx).execute(sql).await?
            } else {
                bind_all(sqlx::query(sql), params).execute(&mut *tx).await?
            };
            outcome.rows_affected += result.rows_affected();
            if result.last_insert_id() != 0 {
                outcome.last_insert_id = Some(result.last_insert_id());
            }
        }

        // Warnings belong to the last statement run on this connection
        outcome.warnings = (&mut *tx)
            .fetch_all("SHOW WARNINGS")
            .await?
            .iter()
            .map(decode_row)
            .collect::<Result<_, _>>()?;

        tx.commit().await?;
        Ok(outcome)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

/// Convert a MySQL row into positional JSON values.
pub(crate) fn decode_row(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    (0..row.columns().len())
        .map(|index| decode_value(row, index))
        .collect()
}

fn decode_value(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    let type_name = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match type_name.as_str() {
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(index)?)
        }
        name if name.ends_with(" UNSIGNED") => Value::from(row.try_get::<u64, _>(index)?),
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(index)?),
        "DATE" => Value::from(row.try_get::<chrono::NaiveDate, _>(index)?.to_string()),
        "DATETIME" => Value::from(
            row.try_get::<chrono::NaiveDateTime, _>(index)?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        "TIMESTAMP" => Value::from(row.try_get::<chrono::DateTime<chrono::Utc>, _>(index)?.to_rfc3339()),
        "TIME" => Value::from(row.try_get::<chrono::NaiveTime, _>(index)?.to_string()),
        "JSON" => row.try_get::<Value, _>(index)?,
        // DECIMAL and the text types arrive as strings on the wire
        _ => match row.try_get_unchecked::<String, _>(index) {
            Ok(text) => Value::from(text),
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
                warn!(column = index, type_name = %type_name, "Non-UTF-8 column value, decoding lossily");
                Value::from(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };

    Ok(value)
}
