//! INSERT rendering and execution.

use super::{quote_ident, QueryBuilder};
use crate::error::DbResult;
use crate::value::Value;

/// Split assignment pairs into quoted column names and values, preserving
/// input order. Insert columns are always quoted.
pub(super) fn insert_parts<I, S>(data: I) -> (Vec<String>, Vec<Value>)
where
    I: IntoIterator<Item = (S, Value)>,
    S: Into<String>,
{
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for (column, value) in data {
        columns.push(quote_ident(&column.into()));
        values.push(value);
    }
    (columns, values)
}

pub(super) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl QueryBuilder {
    /// Render an INSERT statement for the given assignment pairs.
    pub(crate) fn build_insert<I, S>(&self, data: I) -> DbResult<(String, Vec<Value>)>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let table = self.table_name()?;
        let (columns, values) = insert_parts(data);
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns.join(", "),
            placeholders(columns.len())
        );
        Ok((sql, values))
    }

    /// Insert one row and return the generated row identifier.
    pub async fn insert<I, S>(self, data: I) -> DbResult<u64>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (sql, params) = self.build_insert(data)?;
        let result = self.pool().execute(&sql, &params).await?;
        Ok(result.last_insert_id())
    }
}
