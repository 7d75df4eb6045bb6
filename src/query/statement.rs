//! SQL statement builders
//!
//! Safe defaults: every column passes the table allow-list, UPDATE
//! requires at least one assignment and always carries a key predicate.

use super::filter::Filters;
use super::value::{QueryData, SqlValue};
use crate::models::Table;
use crate::{Error, Result};

/// A complete SQL statement with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Split into the query text and executor data. No parameters means the
    /// statement runs verbatim.
    pub fn into_parts(self) -> (String, QueryData) {
        (self.sql, QueryData::single(self.params))
    }
}

/// `SELECT * FROM <table>` restricted by client filters.
pub fn select(table: Table, filters: &Filters) -> Result<Statement> {
    let filters = filters.resolve(table)?;

    let mut sql = format!("SELECT * FROM {}", table.name());
    if let Some(clause) = filters.where_clause() {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }

    Ok(Statement {
        sql,
        params: filters.values().into_iter().map(SqlValue::Text).collect(),
    })
}

/// `INSERT INTO <table> (...) VALUES (?, ...)`
pub fn insert_sql(table: Table, columns: &[&str]) -> Result<String> {
    let columns = columns
        .iter()
        .map(|column| table.require_column(column))
        .collect::<Result<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name(),
        columns.join(", "),
        placeholders
    ))
}

/// Builder for `UPDATE <table> SET ... WHERE <key> = ?`.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    table: Table,
    assignments: Vec<(&'static str, SqlValue)>,
}

impl UpdateStatement {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Result<Self> {
        let column = self.table.require_column(column)?;
        self.assignments.push((column, value.into()));
        Ok(self)
    }

    /// Assign only when the client sent the field. A field sent as `null`
    /// arrives as `Some(None)` and clears the column.
    pub fn set_present<T: Into<SqlValue>>(self, column: &str, value: Option<Option<T>>) -> Result<Self> {
        match value {
            Some(value) => self.set(column, value),
            None => Ok(self),
        }
    }

    pub fn build(self, key: impl Into<SqlValue>) -> Result<Statement> {
        if self.assignments.is_empty() {
            return Err(Error::NothingToUpdate);
        }
        let key_column = self.table.key_column().ok_or_else(|| Error::UnknownColumn {
            table: self.table.name(),
            column: "<key>".to_string(),
        })?;

        let (columns, mut params): (Vec<_>, Vec<_>) = self.assignments.into_iter().unzip();
        let set_clause = columns
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        params.push(key.into());

        Ok(Statement {
            sql: format!("UPDATE {} SET {} WHERE {} = ?", self.table.name(), set_clause, key_column),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_without_filters_runs_verbatim() {
        let statement = select(Table::Bed, &Filters::default()).unwrap();
        assert_eq!(statement.sql, "SELECT * FROM Bed");

        let (_, data) = statement.into_parts();
        assert_eq!(data, QueryData::None);
    }

    #[test]
    fn select_canonicalizes_filter_columns() {
        let filters = Filters::from_query_param("bedID>0,bedID<4");
        let statement = select(Table::Bed, &filters).unwrap();

        assert_eq!(statement.sql, "SELECT * FROM Bed WHERE BedID > ? AND BedID < ?");
        assert_eq!(statement.params, vec![SqlValue::from("0"), SqlValue::from("4")]);
    }

    #[test]
    fn select_rejects_columns_outside_the_table() {
        let filters = Filters::from_query_param("Status=Occupied,MediName=Aspirin");
        let err = select(Table::Bed, &filters).unwrap_err();

        match err {
            Error::UnknownColumn { table, column } => {
                assert_eq!(table, "Bed");
                assert_eq!(column, "MediName");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_touches_only_supplied_fields() {
        let statement = UpdateStatement::new(Table::Bed)
            .set_present("Status", None::<Option<String>>)
            .unwrap()
            .set_present("Pid", Some(Some(3i64)))
            .unwrap()
            .build(5i64)
            .unwrap();

        assert_eq!(statement.sql, "UPDATE Bed SET Pid = ? WHERE BedID = ?");
        assert_eq!(statement.params, vec![SqlValue::Int(3), SqlValue::Int(5)]);
    }

    #[test]
    fn explicit_null_clears_a_column() {
        let statement = UpdateStatement::new(Table::Bed)
            .set("Status", "Available")
            .unwrap()
            .set_present("Pid", Some(None::<i64>))
            .unwrap()
            .build(2i64)
            .unwrap();

        assert_eq!(statement.sql, "UPDATE Bed SET Status = ?, Pid = ? WHERE BedID = ?");
        assert_eq!(
            statement.params,
            vec![SqlValue::from("Available"), SqlValue::Null, SqlValue::Int(2)]
        );
    }

    #[test]
    fn update_without_assignments_is_refused() {
        let err = UpdateStatement::new(Table::Medicine).build(1i64).unwrap_err();
        assert!(matches!(err, Error::NothingToUpdate));
    }

    #[test]
    fn insert_lists_columns_and_placeholders() {
        let sql = insert_sql(Table::Patient, &["Name", "Phone", "Age", "Sex"]).unwrap();
        assert_eq!(sql, "INSERT INTO Patient (Name, Phone, Age, Sex) VALUES (?, ?, ?, ?)");
    }
}
