//! INSERT ... ON DUPLICATE KEY UPDATE rendering and execution.

use super::insert::{insert_parts, placeholders};
use super::{assignment_clause, quote_ident, QueryBuilder};
use crate::error::DbResult;
use crate::value::Value;

/// How the conflict clause of an upsert is produced.
#[derive(Debug, Clone, Default)]
pub enum OnDuplicate {
    /// `col = VALUES(col)` for every inserted column.
    #[default]
    UpdateAll,
    /// A raw update clause, embedded verbatim.
    Raw(String),
    /// Explicit assignments with the same function-literal handling as
    /// update; their params bind after the insert values.
    Set(Vec<(String, Value)>),
}

impl QueryBuilder {
    /// Render an upsert: the INSERT for `data` plus a conflict clause.
    ///
    /// Parameter order matches placeholder order: insert values first, then
    /// any bound conflict-clause values.
    pub(crate) fn build_upsert<I, S>(
        &self,
        data: I,
        on_dup: &OnDuplicate,
    ) -> DbResult<(String, Vec<Value>)>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let table = self.table_name()?;
        let (columns, mut values) = insert_parts(data);

        let update_clause = match on_dup {
            OnDuplicate::UpdateAll => columns
                .iter()
                .map(|c| format!("{c} = VALUES({c})"))
                .collect::<Vec<_>>()
                .join(", "),
            OnDuplicate::Raw(raw) => raw.clone(),
            OnDuplicate::Set(pairs) => {
                let mut parts = Vec::with_capacity(pairs.len());
                for (column, value) in pairs {
                    let (clause, param) = assignment_clause(column, value);
                    parts.push(clause);
                    if let Some(param) = param {
                        values.push(param);
                    }
                }
                parts.join(", ")
            }
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON DUPLICATE KEY UPDATE {}",
            quote_ident(table),
            columns.join(", "),
            placeholders(columns.len()),
            update_clause
        );
        Ok((sql, values))
    }

    /// Upsert with the default conflict clause (`col = VALUES(col)` for
    /// every inserted column). Returns the generated row identifier.
    pub async fn upsert<I, S>(self, data: I) -> DbResult<u64>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        self.upsert_with(data, OnDuplicate::UpdateAll).await
    }

    /// Upsert with an explicit conflict-clause mode. Returns the generated
    /// row identifier.
    pub async fn upsert_with<I, S>(self, data: I, on_dup: OnDuplicate) -> DbResult<u64>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (sql, params) = self.build_upsert(data, &on_dup)?;
        let result = self.pool().execute(&sql, &params).await?;
        Ok(result.last_insert_id())
    }
}
