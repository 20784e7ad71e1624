//! Connect to a local MySQL, run the builder through its paces, and shut
//! down cleanly.
//!
//! Reads `MYSQL_HOST` / `MYSQL_USER` / `MYSQL_PASSWORD` from the
//! environment (or a `.env` file); everything else uses the defaults.

use duosql::{ManagerConfig, OnDuplicate, PoolManager, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut config = ManagerConfig::default();
    config.read.host = std::env::var("MYSQL_HOST").unwrap_or_default();
    config.read.user = std::env::var("MYSQL_USER").unwrap_or_default();
    config.read.password = std::env::var("MYSQL_PASSWORD").unwrap_or_default();

    let manager = PoolManager::connect(config).await?;
    manager.install_shutdown_handler();

    let id = manager
        .write
        .db("app")
        .await
        .table("users")
        .insert([("name", Value::from("alice")), ("age", Value::from(30))])
        .await?;
    println!("inserted row {id}");

    manager
        .write
        .db("app")
        .await
        .table("users")
        .increase("logins")
        .where_eq("id", id)
        .update([("seen_at", Value::from("NOW()"))])
        .await?;

    manager
        .write
        .db("app")
        .await
        .table("settings")
        .upsert_with(
            [("key", Value::from("theme")), ("value", Value::from("dark"))],
            OnDuplicate::Raw("value = VALUES(value)".to_string()),
        )
        .await?;

    let rows = manager
        .read
        .db("app")
        .await
        .table("users")
        .select(&["id", "name"])
        .where_op("age", ">", 18)
        .order_by_desc("id")
        .with_total()
        .limit(10)
        .get()
        .await?;
    println!("fetched {} rows", rows.len());

    manager.close().await;
    Ok(())
}
