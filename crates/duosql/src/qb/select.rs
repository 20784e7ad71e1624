//! SELECT rendering and execution.

use sqlx::mysql::MySqlRow;

use super::{quote_ident, QueryBuilder};
use crate::error::DbResult;
use crate::value::Value;

/// `*` and expression-like fields (qualified, aggregate, parenthesized)
/// pass through; bare column names are quoted.
fn render_field(field: &str) -> String {
    if field == "*" || field.contains(['.', '(', ')']) {
        field.to_string()
    } else {
        quote_ident(field)
    }
}

impl QueryBuilder {
    /// Render the accumulated state into a SELECT statement and its
    /// parameter list.
    ///
    /// Clause order: fields, joins, WHERE (`AND`-joined), the optional
    /// total-count wrap, ORDER BY, LIMIT, OFFSET. The wrap happens before
    /// ORDER BY/LIMIT/OFFSET so pagination applies to the outer query.
    pub(crate) fn build_select(&self) -> DbResult<(String, Vec<Value>)> {
        let table = self.table_name()?;

        let fields: Vec<String> = self.select_list.iter().map(|f| render_field(f)).collect();
        let mut sql = format!("SELECT {} FROM {}", fields.join(", "), quote_ident(table));

        if !self.join_list.is_empty() {
            sql.push(' ');
            sql.push_str(&self.join_list.join(" "));
        }

        if !self.where_list.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_list.join(" AND "));
        }

        if self.with_total {
            sql = format!("SELECT COUNT(*) OVER() AS total, data.* FROM ({sql}) AS data");
        }

        if !self.order_list.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_list.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok((sql, self.binding_list.clone()))
    }

    /// The rendered SELECT SQL (for debugging and tests).
    pub fn to_select_sql(&self) -> DbResult<String> {
        Ok(self.build_select()?.0)
    }

    /// Render and execute the SELECT, returning the matching rows.
    pub async fn get(self) -> DbResult<Vec<MySqlRow>> {
        let (sql, params) = self.build_select()?;
        self.pool().query(&sql, &params).await
    }
}
