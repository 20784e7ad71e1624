//! Fluent query builder.
//!
//! One [`QueryBuilder`] describes a single logical statement: chained calls
//! accumulate fragments (select list, joins, predicates, ordering,
//! assignments), and a terminal operation renders the SQL plus an ordered
//! parameter list and runs it through the owning pool. Builders are
//! single-use — the terminal call consumes the builder.
//!
//! # Usage
//!
//! ```ignore
//! use duosql::{OnDuplicate, Value};
//!
//! // SELECT with pagination and a windowed total
//! let rows = pool.db("app").await
//!     .table("users")
//!     .select(&["id", "name"])
//!     .where_op("name", "LIKE", "ali")
//!     .order_by_desc("created_at")
//!     .with_total()
//!     .limit(20)
//!     .get()
//!     .await?;
//!
//! // INSERT
//! let id = pool.db("app").await
//!     .table("users")
//!     .insert([("name", Value::from("alice")), ("age", 30.into())])
//!     .await?;
//!
//! // UPDATE with an increment and a bound predicate
//! pool.db("app").await
//!     .table("users")
//!     .increase("logins")
//!     .where_eq("id", 7)
//!     .update([("seen_at", Value::from("NOW()"))])
//!     .await?;
//! ```
//!
//! Bare identifiers are backtick-quoted; qualified names (`table.column`)
//! and expressions pass through untouched. Predicates combine with `AND` in
//! call order, and each `where_*` call binds exactly one parameter.

mod insert;
mod select;
mod update;
mod upsert;

pub use upsert::OnDuplicate;

use std::sync::Arc;

use crate::error::{DbError, DbResult};
use crate::logger::Logger;
use crate::pool::Pool;
use crate::value::{is_sql_function, Value};

/// Quote an identifier with backticks, doubling any embedded backtick.
pub(crate) fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
    out
}

/// Quote a predicate column unless it is qualified or an expression.
fn quote_where_column(column: &str) -> String {
    if column.contains('(') || column.contains('.') {
        column.to_string()
    } else {
        quote_ident(column)
    }
}

/// Quote a join/order/assignment column unless it is qualified.
fn quote_plain_column(column: &str) -> String {
    if column.contains('.') {
        column.to_string()
    } else {
        quote_ident(column)
    }
}

/// Render one assignment: allow-listed SQL function calls embed literally,
/// everything else binds.
fn assignment_clause(column: &str, value: &Value) -> (String, Option<Value>) {
    let column = quote_plain_column(column);
    match value {
        Value::Text(s) if is_sql_function(s) => (format!("{column} = {s}"), None),
        value => (format!("{column} = ?"), Some(value.clone())),
    }
}

/// Accumulated state for one statement.
///
/// `where_list` and `binding_list` move in lockstep: clause `i` binds
/// parameter `i`. `set_list` accumulates from [`increase`](Self::increase)
/// calls and from update/upsert assignment data in call order; only
/// parameterized set clauses contribute to `set_params`.
#[derive(Debug)]
pub struct QueryBuilder {
    pool: Pool,
    database: String,
    table: Option<String>,
    select_list: Vec<String>,
    join_list: Vec<String>,
    where_list: Vec<String>,
    binding_list: Vec<Value>,
    order_list: Vec<String>,
    set_list: Vec<String>,
    set_params: Vec<Value>,
    limit: Option<u64>,
    offset: Option<u64>,
    with_total: bool,
}

impl QueryBuilder {
    pub(crate) fn new(pool: Pool, database: &str) -> QueryBuilder {
        QueryBuilder {
            pool,
            database: database.to_string(),
            table: None,
            select_list: vec!["*".to_string()],
            join_list: Vec::new(),
            where_list: Vec::new(),
            binding_list: Vec::new(),
            order_list: Vec::new(),
            set_list: Vec::new(),
            set_params: Vec::new(),
            limit: None,
            offset: None,
            with_total: false,
        }
    }

    /// The database selected when this builder was created.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Set the target table. Required before any terminal operation.
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(name.to_string());
        self
    }

    /// Replace the select list (default `*`). An empty slice keeps the
    /// current list.
    pub fn select(mut self, fields: &[&str]) -> Self {
        if !fields.is_empty() {
            self.select_list = fields.iter().map(|f| f.to_string()).collect();
        }
        self
    }

    /// Wrap the final SELECT so it reports the total matching row count
    /// alongside the paginated rows.
    pub fn with_total(mut self) -> Self {
        self.with_total = true;
        self
    }

    // ==================== JOIN ====================

    /// Add `INNER JOIN table ON left = right`.
    pub fn inner_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join("INNER", table, left, "=", right)
    }

    /// Add an INNER JOIN with an explicit comparison operator.
    pub fn inner_join_on(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join("INNER", table, left, operator, right)
    }

    /// Add `LEFT JOIN table ON left = right`.
    pub fn left_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join("LEFT", table, left, "=", right)
    }

    /// Add a LEFT JOIN with an explicit comparison operator.
    pub fn left_join_on(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join("LEFT", table, left, operator, right)
    }

    /// Add `RIGHT JOIN table ON left = right`.
    pub fn right_join(self, table: &str, left: &str, right: &str) -> Self {
        self.join("RIGHT", table, left, "=", right)
    }

    /// Add a RIGHT JOIN with an explicit comparison operator.
    pub fn right_join_on(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join("RIGHT", table, left, operator, right)
    }

    fn join(mut self, kind: &str, table: &str, left: &str, operator: &str, right: &str) -> Self {
        let left = quote_plain_column(left);
        let right = quote_plain_column(right);
        self.join_list.push(format!(
            "{kind} JOIN {} ON {left} {operator} {right}",
            quote_ident(table)
        ));
        self
    }

    // ==================== WHERE ====================

    /// Add `column = value`.
    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_op(column, "=", value)
    }

    /// Add `column <operator> value`.
    ///
    /// `LIKE` wraps a text value in `%...%` wildcards. `IN` renders a
    /// parenthesized placeholder bound to the whole list value. Each call
    /// appends exactly one clause and one binding.
    pub fn where_op(mut self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        let mut value = value.into();
        if operator == "LIKE" {
            if let Value::Text(s) = &value {
                value = Value::Text(format!("%{s}%"));
            }
        }
        let placeholder = if operator == "IN" { "(?)" } else { "?" };
        self.where_list.push(format!(
            "{} {operator} {placeholder}",
            quote_where_column(column)
        ));
        self.binding_list.push(value);
        self
    }

    // ==================== ORDER / pagination ====================

    /// Add `ORDER BY column ASC`.
    pub fn order_by(self, column: &str) -> Self {
        self.order_by_dir(column, "ASC")
    }

    /// Add `ORDER BY column DESC`.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by_dir(column, "DESC")
    }

    /// Add an ORDER BY clause with an explicit direction (case-insensitive).
    ///
    /// Anything other than `ASC`/`DESC` is logged and skipped; prior state
    /// is left unchanged.
    pub fn order_by_dir(mut self, column: &str, direction: &str) -> Self {
        let dir = direction.to_ascii_uppercase();
        if dir != "ASC" && dir != "DESC" {
            self.logger()
                .action(false, &[&format!("Invalid order direction: {direction}")]);
            return self;
        }
        self.order_list
            .push(format!("{} {dir}", quote_plain_column(column)));
        self
    }

    /// Set LIMIT (rendered as a numeric literal).
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET (rendered as a numeric literal).
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    // ==================== SET ====================

    /// Append `column = column + 1` to the SET list.
    pub fn increase(self, column: &str) -> Self {
        self.increase_by(column, 1)
    }

    /// Append `column = column + delta` to the SET list.
    pub fn increase_by(mut self, column: &str, delta: i64) -> Self {
        self.set_list.push(format!("{column} = {column} + {delta}"));
        self
    }

    /// Fold one assignment into the SET list.
    fn push_assignment(&mut self, column: &str, value: Value) {
        let (clause, param) = assignment_clause(column, &value);
        self.set_list.push(clause);
        if let Some(param) = param {
            self.set_params.push(param);
        }
    }

    // ==================== shared render/exec plumbing ====================

    fn table_name(&self) -> DbResult<&str> {
        match self.table.as_deref() {
            Some(table) => Ok(table),
            None => {
                self.logger().action(true, &["Table is required"]);
                Err(DbError::MissingTable)
            }
        }
    }

    fn pool(&self) -> &Pool {
        &self.pool
    }

    fn logger(&self) -> &Arc<Logger> {
        self.pool.logger()
    }
}

#[cfg(test)]
mod tests;
