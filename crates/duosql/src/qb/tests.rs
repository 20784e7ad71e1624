//! Query builder rendering tests.
//!
//! Rendering is a pure function of the accumulated state, so everything
//! here asserts exact SQL strings and parameter lists against a builder on
//! an offline pool.

use std::sync::Arc;

use super::{quote_ident, OnDuplicate, QueryBuilder};
use crate::error::DbError;
use crate::logger::Logger;
use crate::pool::{Pool, PoolRole};
use crate::value::Value;

fn qb(dir: &tempfile::TempDir) -> QueryBuilder {
    let logger = Arc::new(Logger::open(dir.path()).unwrap());
    QueryBuilder::new(Pool::offline(PoolRole::Read, logger), "testdb")
}

// ==================== identifiers ====================

#[test]
fn quote_ident_backticks() {
    assert_eq!(quote_ident("users"), "`users`");
    assert_eq!(quote_ident("we`ird"), "`we``ird`");
}

// ==================== SELECT ====================

#[test]
fn select_with_only_table() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users");
    assert_eq!(q.to_select_sql().unwrap(), "SELECT * FROM `users`");
}

#[test]
fn select_field_classification() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .select(&["id", "u.name", "COUNT(*)", "*"]);
    assert_eq!(
        q.to_select_sql().unwrap(),
        "SELECT `id`, u.name, COUNT(*), * FROM `users`"
    );
}

#[test]
fn select_empty_field_list_keeps_default() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users").select(&[]);
    assert_eq!(q.to_select_sql().unwrap(), "SELECT * FROM `users`");
}

#[test]
fn select_where_order_limit_offset() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .where_eq("status", "active")
        .order_by("name")
        .limit(10)
        .offset(20);
    let (sql, params) = q.build_select().unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `users` WHERE `status` = ? ORDER BY `name` ASC LIMIT 10 OFFSET 20"
    );
    assert_eq!(params, vec![Value::Text("active".to_string())]);
}

#[test]
fn select_multiple_wheres_join_with_and() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .where_eq("status", "active")
        .where_op("age", ">", 18);
    let (sql, params) = q.build_select().unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `users` WHERE `status` = ? AND `age` > ?"
    );
    assert_eq!(
        params,
        vec![Value::Text("active".to_string()), Value::Int(18)]
    );
}

#[test]
fn select_joins_render_in_call_order() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .inner_join("orders", "users.id", "orders.user_id")
        .left_join_on("profiles", "profile_id", "!=", "id");
    assert_eq!(
        q.to_select_sql().unwrap(),
        "SELECT * FROM `users` \
         INNER JOIN `orders` ON users.id = orders.user_id \
         LEFT JOIN `profiles` ON `profile_id` != `id`"
    );
}

#[test]
fn total_wraps_before_order_and_pagination() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .where_eq("status", "active")
        .with_total()
        .order_by("name")
        .limit(10)
        .offset(10);
    assert_eq!(
        q.to_select_sql().unwrap(),
        "SELECT COUNT(*) OVER() AS total, data.* FROM \
         (SELECT * FROM `users` WHERE `status` = ?) AS data \
         ORDER BY `name` ASC LIMIT 10 OFFSET 10"
    );
}

// ==================== WHERE ====================

#[test]
fn where_clause_count_matches_binding_count() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .where_eq("a", 1)
        .where_op("b", "LIKE", "x")
        .where_op("c", "IN", Value::list([1, 2]))
        .where_op("d", ">=", 3.5);
    assert_eq!(q.where_list.len(), 4);
    assert_eq!(q.where_list.len(), q.binding_list.len());
}

#[test]
fn where_like_wraps_text_in_wildcards() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users").where_op("status", "LIKE", "abc");
    assert_eq!(q.where_list, vec!["`status` LIKE ?"]);
    assert_eq!(q.binding_list, vec![Value::Text("%abc%".to_string())]);
}

#[test]
fn where_like_leaves_non_text_values_alone() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users").where_op("flags", "LIKE", 7);
    assert_eq!(q.binding_list, vec![Value::Int(7)]);
}

#[test]
fn where_in_binds_one_list_value() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .where_op("id", "IN", Value::list([1i64, 2, 3]));
    assert_eq!(q.where_list, vec!["`id` IN (?)"]);
    assert_eq!(
        q.binding_list,
        vec![Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])]
    );
}

#[test]
fn where_qualified_and_expression_columns_stay_raw() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .where_op("u.id", ">", 1)
        .where_eq("LOWER(email)", "a@b.c");
    assert_eq!(q.where_list, vec!["u.id > ?", "LOWER(email) = ?"]);
}

// ==================== ORDER BY ====================

#[test]
fn order_by_direction_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users").order_by_dir("name", "desc");
    assert_eq!(q.order_list, vec!["`name` DESC"]);
}

#[test]
fn order_by_invalid_direction_is_skipped_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir)
        .table("users")
        .order_by("id")
        .order_by_dir("name", "sideways");
    assert_eq!(q.order_list, vec!["`id` ASC"]);

    let action = std::fs::read_to_string(dir.path().join("action.log")).unwrap();
    assert!(action.contains("Invalid order direction: sideways"));
}

#[test]
fn order_by_qualified_column_stays_raw() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users").order_by_desc("u.created_at");
    assert_eq!(q.order_list, vec!["u.created_at DESC"]);
}

// ==================== INSERT ====================

#[test]
fn insert_renders_columns_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users");
    let (sql, params) = q
        .build_insert([
            ("name", Value::from("alice")),
            ("age", Value::from(30)),
        ])
        .unwrap();
    assert_eq!(sql, "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)");
    assert_eq!(
        params,
        vec![Value::Text("alice".to_string()), Value::Int(30)]
    );
}

#[test]
fn insert_quotes_every_column() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("t");
    let (sql, _) = q
        .build_insert([("a.b", Value::Null)])
        .unwrap();
    assert_eq!(sql, "INSERT INTO `t` (`a.b`) VALUES (?)");
}

// ==================== UPDATE ====================

#[test]
fn update_embeds_function_literals_unparameterized() {
    let dir = tempfile::tempdir().unwrap();
    let mut q = qb(&dir).table("users").where_eq("id", 7);
    q.push_assignment("updated_at", Value::from("NOW()"));
    q.push_assignment("name", Value::from("alice"));
    let (sql, params) = q.build_update().unwrap();
    assert_eq!(
        sql,
        "UPDATE `users` SET `updated_at` = NOW(), `name` = ? WHERE `id` = ?"
    );
    assert_eq!(
        params,
        vec![Value::Text("alice".to_string()), Value::Int(7)]
    );
}

#[test]
fn update_function_match_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let mut q = qb(&dir).table("users");
    q.push_assignment("touched_at", Value::from("now()"));
    let (sql, params) = q.build_update().unwrap();
    assert_eq!(sql, "UPDATE `users` SET `touched_at` = now()");
    assert!(params.is_empty());
}

#[test]
fn update_set_params_precede_where_bindings() {
    let dir = tempfile::tempdir().unwrap();
    let mut q = qb(&dir)
        .table("users")
        .where_eq("status", "active")
        .where_op("age", ">", 18);
    q.push_assignment("name", Value::from("bob"));
    q.push_assignment("score", Value::from(10));
    let (sql, params) = q.build_update().unwrap();
    assert_eq!(
        sql,
        "UPDATE `users` SET `name` = ?, `score` = ? WHERE `status` = ? AND `age` > ?"
    );
    assert_eq!(
        params,
        vec![
            Value::Text("bob".to_string()),
            Value::Int(10),
            Value::Text("active".to_string()),
            Value::Int(18),
        ]
    );
}

#[test]
fn update_appends_assignments_after_increase_clauses() {
    let dir = tempfile::tempdir().unwrap();
    let mut q = qb(&dir).table("users").increase("logins").increase_by("score", 5);
    q.push_assignment("seen_at", Value::from("NOW()"));
    let (sql, params) = q.build_update().unwrap();
    assert_eq!(
        sql,
        "UPDATE `users` SET logins = logins + 1, score = score + 5, `seen_at` = NOW()"
    );
    assert!(params.is_empty());
}

#[test]
fn update_without_set_clauses_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users").where_eq("id", 1);
    assert!(matches!(q.build_update(), Err(DbError::Validation(_))));
}

#[test]
fn update_dotted_column_stays_raw() {
    let dir = tempfile::tempdir().unwrap();
    let mut q = qb(&dir).table("users");
    q.push_assignment("u.name", Value::from("x"));
    let (sql, _) = q.build_update().unwrap();
    assert_eq!(sql, "UPDATE `users` SET u.name = ?");
}

// ==================== UPSERT ====================

#[test]
fn upsert_default_updates_every_inserted_column() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users");
    let (sql, params) = q
        .build_upsert(
            [("a", Value::from(1)), ("b", Value::from(2))],
            &OnDuplicate::UpdateAll,
        )
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `users` (`a`, `b`) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE `a` = VALUES(`a`), `b` = VALUES(`b`)"
    );
    assert_eq!(params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn upsert_raw_clause_is_embedded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("counters");
    let (sql, _) = q
        .build_upsert(
            [("key", Value::from("hits"))],
            &OnDuplicate::Raw("value = value + 1".to_string()),
        )
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `counters` (`key`) VALUES (?) \
         ON DUPLICATE KEY UPDATE value = value + 1"
    );
}

#[test]
fn upsert_set_mode_binds_after_insert_values() {
    let dir = tempfile::tempdir().unwrap();
    let q = qb(&dir).table("users");
    let (sql, params) = q
        .build_upsert(
            [("id", Value::from(1)), ("name", Value::from("alice"))],
            &OnDuplicate::Set(vec![
                ("seen_at".to_string(), Value::from("NOW()")),
                ("name".to_string(), Value::from("bob")),
            ]),
        )
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `users` (`id`, `name`) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE `seen_at` = NOW(), `name` = ?"
    );
    assert_eq!(
        params,
        vec![
            Value::Int(1),
            Value::Text("alice".to_string()),
            Value::Text("bob".to_string()),
        ]
    );
}

// ==================== missing table ====================

#[test]
fn every_renderer_requires_a_table() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        qb(&dir).build_select(),
        Err(DbError::MissingTable)
    ));
    assert!(matches!(
        qb(&dir).build_insert([("a", Value::from(1))]),
        Err(DbError::MissingTable)
    ));
    assert!(matches!(
        qb(&dir).build_update(),
        Err(DbError::MissingTable)
    ));
    assert!(matches!(
        qb(&dir).build_upsert([("a", Value::from(1))], &OnDuplicate::UpdateAll),
        Err(DbError::MissingTable)
    ));

    let action = std::fs::read_to_string(dir.path().join("action.log")).unwrap();
    assert!(action.contains("[ERROR] Table is required"));
}

#[test]
fn rendering_is_deterministic_for_a_fixed_call_sequence() {
    let build = || {
        let dir = tempfile::tempdir().unwrap();
        qb(&dir)
            .table("users")
            .select(&["id", "name"])
            .where_op("status", "LIKE", "act")
            .where_op("id", "IN", Value::list([4i64, 5]))
            .order_by_desc("id")
            .with_total()
            .limit(5)
            .build_select()
            .unwrap()
    };
    assert_eq!(build(), build());
}
