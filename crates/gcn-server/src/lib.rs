//! # gcn-server
//!
//! HTTP server for the GCN Kafka admin and circulars service.
//!
//! Wires the `PostgreSQL` providers, the broker seams, and the admin API
//! routers into one Axum application with graceful shutdown. Shutdown
//! drains in-flight requests, then closes the producer connection; the
//! producer's persistent lifecycle relies on this hook.
//!
//! ## Usage
//!
//! ```ignore
//! use gcn_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod router;

pub use config::ServerConfig;
pub use router::create_router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use gcn_admin_api::{AdminSettings, AdminState, StaticGroupResolver, UserContext};
use gcn_broker::{InMemoryBroker, Publisher};
use gcn_storage_sql::{PgAclMirrorProvider, PgCircularProvider, PgSyncLogProvider};

/// Application state with the concrete provider stack.
pub type AppState = AdminState<
    PgAclMirrorProvider,
    PgSyncLogProvider,
    PgCircularProvider,
    InMemoryBroker,
    StaticGroupResolver,
>;

/// The GCN server.
pub struct Server {
    config: ServerConfig,
    pool: PgPool,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// Initializes the database connection pool and bootstraps the
    /// schema.
    ///
    /// # Errors
    ///
    /// Fails when the database is unreachable or schema creation is
    /// rejected.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let pool_config = gcn_storage_sql::PoolConfig::new(&config.database_url)
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .connect_timeout(Duration::from_secs(30));

        let pool = gcn_storage_sql::create_pool(&pool_config).await?;
        gcn_storage_sql::init_schema(&pool).await?;

        tracing::info!("Database connection pool created");

        Ok(Self { config, pool })
    }

    /// Runs the server.
    ///
    /// Blocks until a shutdown signal arrives, then drains in-flight
    /// requests and closes the producer connection.
    ///
    /// # Errors
    ///
    /// Fails when the listen address cannot be bound or the server loop
    /// errors.
    pub async fn run(self) -> anyhow::Result<()> {
        let state = self.build_state();
        let publisher = Arc::clone(&state.publisher);
        let app = create_router(state, &self.config.cors_origins);

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(
            broker = %self.config.kafka_broker,
            mode = ?self.config.delivery_mode(),
            "Server listening on http://{addr}"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // The persistent producer lifecycle has no other close path.
        if let Err(err) = publisher.close().await {
            tracing::warn!(error = %err, "failed to close producer connection");
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Creates a test router without starting the server.
    pub fn test_router(&self) -> Router {
        create_router(self.build_state(), &self.config.cors_origins)
    }

    fn build_state(&self) -> AppState {
        let broker = Arc::new(InMemoryBroker::new());
        let publisher = Arc::new(Publisher::new(
            Arc::clone(&broker) as _,
            self.config.delivery_mode(),
        ));

        let mut resolver = StaticGroupResolver::new();
        if let Some(token) = &self.config.admin_token {
            resolver.add_token(
                token,
                UserContext::new("kafka-admin@local", [self.config.admin_group.clone()]),
            );
        }
        if let Some(token) = &self.config.submitter_token {
            resolver.add_token(
                token,
                UserContext::new("submitter@local", [self.config.submitter_group.clone()]),
            );
        }

        AdminState::new(
            Arc::new(PgAclMirrorProvider::new(self.pool.clone())),
            Arc::new(PgSyncLogProvider::new(self.pool.clone())),
            Arc::new(PgCircularProvider::new(self.pool.clone())),
            broker,
            publisher,
            Arc::new(resolver),
            AdminSettings {
                admin_group: self.config.admin_group.clone(),
                submitter_group: self.config.submitter_group.clone(),
                circulars_topic: self.config.circulars_topic.clone(),
            },
        )
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
