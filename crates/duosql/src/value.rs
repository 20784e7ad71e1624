//! Parameter values bound to statement placeholders.
//!
//! Insert/update/upsert data and WHERE bindings travel as an ordered list of
//! [`Value`]s alongside the rendered SQL, so that column order and
//! placeholder order stay deterministic instead of depending on map
//! iteration.

use chrono::{DateTime, Utc};

/// SQL built-in calls that may appear as a string value in update/upsert
/// data and are embedded literally instead of bound.
///
/// Matching is case-insensitive against this fixed list. A genuine string
/// value that happens to spell one of these (e.g. `"PI()"`) is treated as a
/// function call; callers that need the literal string must not route it
/// through assignment data.
pub(crate) const SQL_FUNCTIONS: [&str; 15] = [
    "NOW()",
    "CURRENT_TIMESTAMP",
    "UUID()",
    "RAND()",
    "CURDATE()",
    "CURTIME()",
    "UNIX_TIMESTAMP()",
    "UTC_TIMESTAMP()",
    "SYSDATE()",
    "LOCALTIME()",
    "LOCALTIMESTAMP()",
    "PI()",
    "DATABASE()",
    "USER()",
    "VERSION()",
];

/// Check a string value against the function allow-list.
pub(crate) fn is_sql_function(s: &str) -> bool {
    let upper = s.to_ascii_uppercase();
    SQL_FUNCTIONS.contains(&upper.as_str())
}

/// A single bound parameter.
///
/// [`Value::List`] is produced by `IN` conditions and stays a single
/// parameter through rendering; the pool expands it to one placeholder per
/// element at execute time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(DateTime<Utc>),
    List(Vec<Value>),
}

impl Value {
    /// Build a [`Value::List`] from anything iterable.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_allow_list_is_case_insensitive() {
        assert!(is_sql_function("NOW()"));
        assert!(is_sql_function("now()"));
        assert!(is_sql_function("Current_Timestamp"));
        assert!(is_sql_function("unix_timestamp()"));
        assert!(!is_sql_function("NOW"));
        assert!(!is_sql_function("DROP TABLE users"));
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::from(5i32), Value::Int(5));
        assert_eq!(Value::from(5u64), Value::UInt(5));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(Option::<i64>::None), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn list_builder() {
        assert_eq!(
            Value::list([1i64, 2, 3]),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}
