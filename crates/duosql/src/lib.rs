//! # duosql
//!
//! A fluent MySQL query builder with split read/write connection pools.
//!
//! ## Features
//!
//! - **Chained statement building**: SELECT/INSERT/UPDATE/UPSERT assembled
//!   from builder state, rendered to SQL plus an ordered parameter list
//! - **Dual pools**: one pool per traffic role, write settings defaulting
//!   to the read settings
//! - **Fail-fast startup**: both pools are probed before the manager is
//!   handed out
//! - **Slow-query logging**: statements over 20ms land in the action log
//!   together with their SQL
//! - **Dual-stream file logs**: `init.log` / `action.log`, mirrored to
//!   stdout and to `tracing`
//!
//! ## Quick start
//!
//! ```ignore
//! use duosql::{ManagerConfig, PoolManager, Value};
//!
//! let manager = PoolManager::connect(ManagerConfig::default()).await?;
//!
//! let rows = manager.read.db("app").await
//!     .table("users")
//!     .select(&["id", "name"])
//!     .where_op("name", "LIKE", "ali")
//!     .order_by_desc("created_at")
//!     .limit(20)
//!     .get()
//!     .await?;
//!
//! let id = manager.write.db("app").await
//!     .table("users")
//!     .insert([("name", Value::from("alice")), ("age", 30.into())])
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod manager;
pub mod pool;
pub mod qb;
pub mod value;

pub use config::{ManagerConfig, PoolConfig, DEFAULT_LOG_PATH};
pub use error::{DbError, DbResult};
pub use logger::Logger;
pub use manager::PoolManager;
pub use pool::{Pool, PoolRole, SLOW_QUERY_THRESHOLD};
pub use qb::{OnDuplicate, QueryBuilder};
pub use value::Value;
