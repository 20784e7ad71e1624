//! Read/write pool pairing and lifecycle.
//!
//! [`PoolManager::connect`] brings up the logger, applies configuration
//! defaults, opens both pools, and probes each before returning — a failed
//! probe aborts startup with a wrapped error and no partially connected
//! manager escapes. Shutdown-signal handling is opt-in via
//! [`PoolManager::install_shutdown_handler`]; the host entry point decides
//! whether to install it.

use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Connection;

use crate::config::{ManagerConfig, PoolConfig};
use crate::error::{DbError, DbResult};
use crate::logger::Logger;
use crate::pool::{Pool, PoolRole};

/// Pooled connections are recycled after at most this long.
const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Upper bound on waiting for a connection; keeps the startup probe from
/// retrying for the driver's 30s default before reporting failure.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns one read pool and one write pool sharing a single [`Logger`].
#[derive(Debug)]
pub struct PoolManager {
    pub read: Pool,
    pub write: Pool,
    logger: Arc<Logger>,
}

impl PoolManager {
    /// Open both pools, validate connectivity, and return the manager.
    ///
    /// The read config is normalized (zero values replaced with defaults);
    /// the write config falls back to the read config when absent.
    pub async fn connect(config: ManagerConfig) -> DbResult<PoolManager> {
        let logger = Arc::new(Logger::open(config.log_dir())?);

        let read_config = config.read.clone().normalized();
        let write_config = config
            .write
            .clone()
            .unwrap_or_else(|| read_config.clone());

        let read = open_pool(PoolRole::Read, &read_config, &logger).await?;
        let write = open_pool(PoolRole::Write, &write_config, &logger).await?;

        logger.init(
            false,
            &[&format!(
                "Pools ready: read={}:{} write={}:{}",
                read_config.host, read_config.port, write_config.host, write_config.port
            )],
        );

        Ok(PoolManager {
            read,
            write,
            logger,
        })
    }

    /// Close both pools. Best-effort; later statements fail with
    /// [`DbError::ConnectionUnavailable`].
    pub async fn close(&self) {
        self.read.close().await;
        self.write.close().await;
    }

    /// Spawn a task that closes both pools and exits the process when a
    /// termination signal arrives (ctrl-c, and SIGTERM on unix).
    ///
    /// Shutdown is abrupt: in-flight statements are not drained.
    pub fn install_shutdown_handler(&self) {
        let read = self.read.clone();
        let write = self.write.clone();
        let logger = Arc::clone(&self.logger);
        tokio::spawn(async move {
            wait_for_shutdown_signal().await;
            logger.action(false, &["Shutdown signal received, closing pools"]);
            read.close().await;
            write.close().await;
            std::process::exit(0);
        });
    }

    /// The logger shared by both pools.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

async fn open_pool(role: PoolRole, config: &PoolConfig, logger: &Arc<Logger>) -> DbResult<Pool> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .charset(&config.charset);

    let handle = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(MAX_CONNECTION_LIFETIME)
        .idle_timeout(MAX_CONNECTION_LIFETIME / 2)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(options);

    if let Err(err) = probe(&handle).await {
        logger.init(
            true,
            &[&format!("Failed to connect {role} pool"), &err.to_string()],
        );
        handle.close().await;
        return Err(DbError::connection(format!(
            "failed to connect {role} pool: {err}"
        )));
    }

    Ok(Pool::new(role, handle, Arc::clone(logger)))
}

async fn probe(handle: &MySqlPool) -> Result<(), sqlx::Error> {
    let mut conn = handle.acquire().await?;
    conn.ping().await
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
