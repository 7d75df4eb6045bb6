//! Filter expressions for list endpoints
//!
//! Clients restrict `GET /beds` and friends with a comma-separated list of
//! `column<op>value` tokens, e.g. `Status=Occupied,Type=Private` or
//! `bedID>0,bedID<4`. Each token becomes one parameterized predicate.

use crate::models::Table;
use crate::Result;

/// Supported operators, in the order they are looked for.
pub const OPERATORS: [char; 3] = ['=', '>', '<'];

/// One parsed `column<op>value` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub operator: char,
    pub value: String,
}

impl Condition {
    /// Parse a single token.
    ///
    /// The operator is the first of `=`, `>`, `<` that occurs anywhere in the
    /// token, checked in that order, and the token is split at its first
    /// occurrence. `a<b>c` therefore reads as column `a<b`, operator `>`,
    /// value `c`. Tokens without any operator yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        OPERATORS.iter().find_map(|&operator| {
            token.split_once(operator).map(|(column, value)| Condition {
                column: column.trim().to_string(),
                operator,
                value: value.trim().to_string(),
            })
        })
    }

    /// `"{column} {op} ?"`
    pub fn predicate(&self) -> String {
        format!("{} {} ?", self.column, self.operator)
    }
}

/// An ordered set of conditions, combined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    conditions: Vec<Condition>,
}

impl Filters {
    /// Parse raw tokens, silently dropping the ones without an operator.
    pub fn parse<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            conditions: tokens.into_iter().filter_map(Condition::parse).collect(),
        }
    }

    /// Parse the `filters` query parameter as sent by clients.
    pub fn from_query_param(raw: &str) -> Self {
        Self::parse(raw.split(','))
    }

    /// Rewrite every column to its canonical spelling in `table`, failing on
    /// the first column the table does not have.
    pub fn resolve(&self, table: Table) -> Result<Filters> {
        let conditions = self
            .conditions
            .iter()
            .map(|condition| {
                Ok(Condition {
                    column: table.require_column(&condition.column)?.to_string(),
                    ..condition.clone()
                })
            })
            .collect::<Result<_>>()?;
        Ok(Filters { conditions })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// SQL fragments, parallel to [`Filters::values`].
    pub fn predicates(&self) -> Vec<String> {
        self.conditions.iter().map(Condition::predicate).collect()
    }

    /// Bound values, parallel to [`Filters::predicates`].
    pub fn values(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.value.clone()).collect()
    }

    /// The predicates joined with `AND`, or `None` when there are none.
    pub fn where_clause(&self) -> Option<String> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(self.predicates().join(" AND "))
        }
    }
}
