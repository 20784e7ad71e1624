//! UPDATE rendering and execution.

use super::{quote_ident, QueryBuilder};
use crate::error::{DbError, DbResult};
use crate::value::Value;

impl QueryBuilder {
    /// Render the accumulated SET/WHERE state into an UPDATE statement.
    ///
    /// SET placeholders precede WHERE placeholders in the statement, so the
    /// parameter list is the set params followed by the where bindings.
    pub(crate) fn build_update(&self) -> DbResult<(String, Vec<Value>)> {
        let table = self.table_name()?;
        if self.set_list.is_empty() {
            return Err(DbError::validation("update requires at least one SET clause"));
        }

        let mut sql = format!("UPDATE {} SET {}", quote_ident(table), self.set_list.join(", "));
        if !self.where_list.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_list.join(" AND "));
        }

        let mut params = self.set_params.clone();
        params.extend(self.binding_list.iter().cloned());
        Ok((sql, params))
    }

    /// Apply the assignment pairs after any accumulated `increase` clauses,
    /// execute the UPDATE, and return the affected row count.
    ///
    /// A string value matching the SQL-function allow-list (`NOW()`,
    /// `UUID()`, ...) is embedded literally; everything else is bound.
    pub async fn update<I, S>(mut self, data: I) -> DbResult<u64>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        for (column, value) in data {
            self.push_assignment(&column.into(), value);
        }
        let (sql, params) = self.build_update()?;
        let result = self.pool().execute(&sql, &params).await?;
        Ok(result.rows_affected())
    }
}
