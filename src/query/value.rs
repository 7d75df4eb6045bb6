use chrono::NaiveDate;
use serde::Serialize;

/// A single bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Parameter data handed to the executor alongside a statement.
///
/// `None` runs the statement verbatim, `Single` binds one parameter set and
/// `Batch` runs the same statement once per parameter set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum QueryData {
    #[default]
    None,
    Single(Vec<SqlValue>),
    Batch(Vec<Vec<SqlValue>>),
}

impl QueryData {
    /// Empty parameter lists are treated as no data at all
    pub fn single(params: Vec<SqlValue>) -> Self {
        if params.is_empty() {
            QueryData::None
        } else {
            QueryData::Single(params)
        }
    }

    /// The parameter sets to run, one execution each. `None` yields a single
    /// empty set, meaning "execute verbatim".
    pub fn parameter_sets(&self) -> Vec<&[SqlValue]> {
        match self {
            QueryData::None => vec![&[] as &[SqlValue]],
            QueryData::Single(params) => vec![params.as_slice()],
            QueryData::Batch(batch) => batch.iter().map(Vec::as_slice).collect(),
        }
    }
}
