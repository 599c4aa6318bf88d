//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use gcn_broker::DeliveryMode;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Database connection URL.
    pub database_url: String,

    /// Minimum database connections.
    pub db_min_connections: u32,

    /// Maximum database connections.
    pub db_max_connections: u32,

    /// Kafka broker bootstrap address.
    pub kafka_broker: String,

    /// OAuth client id for the general producer client. Reserved for a
    /// network-backed producer connector; the bundled in-process broker
    /// does not authenticate.
    pub kafka_client_id: Option<String>,

    /// OAuth client secret for the general producer client. Reserved for
    /// a network-backed producer connector.
    pub kafka_client_secret: Option<String>,

    /// OAuth client id for the admin client. Reserved for a
    /// network-backed broker admin.
    pub kafka_admin_client_id: Option<String>,

    /// OAuth client secret for the admin client. Reserved for a
    /// network-backed broker admin.
    pub kafka_admin_client_secret: Option<String>,

    /// Sandbox mode: short-lived hosts that cannot rely on a shutdown
    /// hook use an ephemeral producer connection per publish.
    pub sandbox: bool,

    /// Group that gates the Kafka admin routes.
    pub admin_group: String,

    /// Group that gates circular submission.
    pub submitter_group: String,

    /// Topic that stored circulars are published to.
    pub circulars_topic: String,

    /// Static bearer token granted the admin group, if configured.
    pub admin_token: Option<String>,

    /// Static bearer token granted the submitter group, if configured.
    pub submitter_token: Option<String>,

    /// CORS allowed origins (comma-separated; `*` allows any).
    pub cors_origins: Vec<String>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("GCN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("GCN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let db_min_connections = std::env::var("GCN_DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        let db_max_connections = std::env::var("GCN_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let kafka_broker =
            std::env::var("GCN_KAFKA_BROKER").unwrap_or_else(|_| "localhost:9092".to_string());
        let kafka_client_id = std::env::var("GCN_KAFKA_CLIENT_ID").ok();
        let kafka_client_secret = std::env::var("GCN_KAFKA_CLIENT_SECRET").ok();
        let kafka_admin_client_id = std::env::var("GCN_KAFKA_ADMIN_CLIENT_ID").ok();
        let kafka_admin_client_secret = std::env::var("GCN_KAFKA_ADMIN_CLIENT_SECRET").ok();

        let sandbox = std::env::var("GCN_SANDBOX")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let admin_group = std::env::var("GCN_KAFKA_ADMIN_GROUP")
            .unwrap_or_else(|_| "gcn.nasa.gov/kafka-admin".to_string());
        let submitter_group = std::env::var("GCN_CIRCULAR_SUBMITTER_GROUP")
            .unwrap_or_else(|_| "gcn.nasa.gov/circular-submitter".to_string());
        let circulars_topic =
            std::env::var("GCN_CIRCULARS_TOPIC").unwrap_or_else(|_| "gcn.circulars".to_string());

        let admin_token = std::env::var("GCN_ADMIN_TOKEN").ok();
        let submitter_token = std::env::var("GCN_SUBMITTER_TOKEN").ok();

        let cors_origins = std::env::var("GCN_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            database_url,
            db_min_connections,
            db_max_connections,
            kafka_broker,
            kafka_client_id,
            kafka_client_secret,
            kafka_admin_client_id,
            kafka_admin_client_secret,
            sandbox,
            admin_group,
            submitter_group,
            circulars_topic,
            admin_token,
            submitter_token,
            cors_origins,
            log_level,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(database_url: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            database_url: database_url.to_string(),
            db_min_connections: 1,
            db_max_connections: 5,
            sandbox: true,
            admin_token: Some("test-admin-token".to_string()),
            submitter_token: Some("test-submitter-token".to_string()),
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Returns the producer lifecycle mode selected by the sandbox flag.
    #[must_use]
    pub const fn delivery_mode(&self) -> DeliveryMode {
        if self.sandbox {
            DeliveryMode::Ephemeral
        } else {
            DeliveryMode::Persistent
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/gcn".to_string(),
            db_min_connections: 1,
            db_max_connections: 10,
            kafka_broker: "localhost:9092".to_string(),
            kafka_client_id: None,
            kafka_client_secret: None,
            kafka_admin_client_id: None,
            kafka_admin_client_secret: None,
            sandbox: false,
            admin_group: "gcn.nasa.gov/kafka-admin".to_string(),
            submitter_group: "gcn.nasa.gov/circular-submitter".to_string(),
            circulars_topic: "gcn.circulars".to_string(),
            admin_token: None,
            submitter_token: None,
            cors_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_selects_the_ephemeral_producer() {
        let mut config = ServerConfig::default();
        assert_eq!(config.delivery_mode(), DeliveryMode::Persistent);

        config.sandbox = true;
        assert_eq!(config.delivery_mode(), DeliveryMode::Ephemeral);
    }
}
