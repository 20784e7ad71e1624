//! Role-bound connection pools and statement execution.
//!
//! A [`Pool`] wraps one `sqlx` MySQL pool in either the read or the write
//! role. Both entry points measure wall-clock duration and report anything
//! over [`SLOW_QUERY_THRESHOLD`] through the action log, together with the
//! statement text.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlQueryResult, MySqlRow};
use sqlx::query::Query;

use crate::error::{DbError, DbResult};
use crate::logger::Logger;
use crate::qb::{quote_ident, QueryBuilder};
use crate::value::Value;

/// Statements slower than this are reported through the action log.
pub const SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(20);

/// Which traffic a pool carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolRole {
    Read,
    Write,
}

impl fmt::Display for PoolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolRole::Read => f.write_str("read"),
            PoolRole::Write => f.write_str("write"),
        }
    }
}

/// One live database handle bound to a single role.
///
/// Cloning is cheap and clones share the handle slot: closing through any
/// clone closes them all, after which statements fail with
/// [`DbError::ConnectionUnavailable`].
#[derive(Debug, Clone)]
pub struct Pool {
    handle: Arc<RwLock<Option<MySqlPool>>>,
    logger: Arc<Logger>,
    role: PoolRole,
}

impl Pool {
    pub(crate) fn new(role: PoolRole, handle: MySqlPool, logger: Arc<Logger>) -> Pool {
        Pool {
            handle: Arc::new(RwLock::new(Some(handle))),
            logger,
            role,
        }
    }

    /// A pool with no live handle. Every statement fails with
    /// [`DbError::ConnectionUnavailable`].
    pub(crate) fn offline(role: PoolRole, logger: Arc<Logger>) -> Pool {
        Pool {
            handle: Arc::new(RwLock::new(None)),
            logger,
            role,
        }
    }

    pub fn role(&self) -> PoolRole {
        self.role
    }

    /// Whether the handle is still open.
    pub fn is_open(&self) -> bool {
        self.handle.read().unwrap().is_some()
    }

    pub(crate) fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Select a database and start a fresh [`QueryBuilder`] on this pool.
    ///
    /// Issues ``USE `name` `` through the pool; a failure is logged to the
    /// action stream and the builder is still returned.
    pub async fn db(&self, database: &str) -> QueryBuilder {
        let stmt = format!("USE {}", quote_ident(database));
        if let Err(err) = self.execute(&stmt, &[]).await {
            self.logger.action(
                true,
                &[
                    &format!("Failed to switch to database {database}"),
                    &err.to_string(),
                ],
            );
        }
        QueryBuilder::new(self.clone(), database)
    }

    /// Run a statement that returns rows.
    pub async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<MySqlRow>> {
        let handle = self.current_handle()?;
        let (sql, params) = expand_list_params(sql, params);
        let started = Instant::now();
        let result = bind_params(sqlx::query(&sql), &params).fetch_all(&handle).await;
        self.observe(&sql, started.elapsed());
        Ok(result?)
    }

    /// Run a statement and return the driver result (affected rows, last
    /// insert id).
    pub async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<MySqlQueryResult> {
        let handle = self.current_handle()?;
        let (sql, params) = expand_list_params(sql, params);
        let started = Instant::now();
        let result = bind_params(sqlx::query(&sql), &params).execute(&handle).await;
        self.observe(&sql, started.elapsed());
        Ok(result?)
    }

    /// Take the handle out and close it. Best-effort; later statements see
    /// [`DbError::ConnectionUnavailable`].
    pub(crate) async fn close(&self) {
        let taken = self.handle.write().unwrap().take();
        if let Some(handle) = taken {
            handle.close().await;
        }
    }

    fn current_handle(&self) -> DbResult<MySqlPool> {
        match self.handle.read().unwrap().as_ref() {
            Some(handle) => Ok(handle.clone()),
            None => {
                self.logger
                    .action(true, &["Database connection is not available"]);
                Err(DbError::ConnectionUnavailable)
            }
        }
    }

    fn observe(&self, sql: &str, elapsed: Duration) {
        if elapsed > SLOW_QUERY_THRESHOLD {
            self.logger
                .action(false, &[&format!("Slow Query: {elapsed:?}"), sql]);
        }
    }
}

fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in params {
        query = match value {
            Value::Null => query.bind(Option::<String>::None),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::UInt(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Bytes(v) => query.bind(v.as_slice()),
            Value::DateTime(v) => query.bind(*v),
            // Flattened by expand_list_params; an empty list became Null there.
            Value::List(_) => query.bind(Option::<String>::None),
        };
    }
    query
}

/// Expand each `?` bound to a [`Value::List`] into one placeholder per
/// element.
///
/// MySQL cannot bind an array to a single placeholder, so the rendered
/// `IN (?)` contract is bridged here at execute time. `?` inside single-quoted
/// string literals is left alone. An empty list keeps its placeholder and
/// binds NULL (`IN (NULL)` matches no rows, which is what an empty list means).
fn expand_list_params(sql: &str, params: &[Value]) -> (String, Vec<Value>) {
    if !params.iter().any(|p| matches!(p, Value::List(_))) {
        return (sql.to_string(), params.to_vec());
    }

    let mut out = String::with_capacity(sql.len());
    let mut flat: Vec<Value> = Vec::with_capacity(params.len());
    let mut remaining = params.iter();
    let mut in_string = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_string = !in_string;
                out.push(ch);
            }
            '?' if !in_string => match remaining.next() {
                Some(Value::List(items)) if items.is_empty() => {
                    out.push('?');
                    flat.push(Value::Null);
                }
                Some(Value::List(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push('?');
                        flat.push(item.clone());
                    }
                }
                Some(value) => {
                    out.push('?');
                    flat.push(value.clone());
                }
                // More placeholders than params; let the driver report it.
                None => out.push('?'),
            },
            _ => out.push(ch),
        }
    }

    // Params beyond the last placeholder pass through for the same reason.
    flat.extend(remaining.cloned());
    (out, flat)
}
