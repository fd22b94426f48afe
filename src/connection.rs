//! Redis connection management.

use crate::error::{Error, Result};
use redis::aio::ConnectionManager;
use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

/// Connection parameters used to build a Redis client when no URL is at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Logical database index.
    pub db: i64,
    /// Optional ACL username.
    pub username: Option<String>,
    /// Optional password.
    pub password: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            username: None,
            password: None,
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given host with default port and database.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database index.
    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// Set the ACL username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Build the connection parameters the client connects with.
    ///
    /// Credentials are passed through as given, so they may contain any
    /// character, including ones that are reserved in URLs.
    pub fn connection_info(&self) -> Result<ConnectionInfo> {
        self.validate()?;
        Ok(ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.db,
                username: self.username.clone(),
                password: self.password.clone(),
                ..RedisConnectionInfo::default()
            },
        })
    }

    /// Render the config as a `redis://` URL for display.
    ///
    /// The password is masked; connect through [`connection_info`](Self::connection_info).
    pub fn to_url(&self) -> Result<String> {
        self.validate()?;

        let auth = match (&self.username, &self.password) {
            (Some(user), Some(_)) => format!("{}:****@", user),
            (None, Some(_)) => ":****@".to_string(),
            (Some(user), None) => format!("{}@", user),
            (None, None) => String::new(),
        };

        Ok(format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.db))
    }

    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::InvalidConfig("host must not be empty".to_string()));
        }
        if self.db < 0 {
            return Err(Error::InvalidConfig(format!(
                "database index must be non-negative, got {}",
                self.db
            )));
        }
        Ok(())
    }
}

/// Redis connection wrapper that manages connection lifecycle.
pub struct RedisConnection {
    client: Client,
}

impl RedisConnection {
    /// Create a new Redis connection from a URL.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Examples
    /// ```ignore
    /// let conn = RedisConnection::new("redis://localhost:6379")?;
    /// ```
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self { client })
    }

    /// Create a new Redis connection from structured parameters.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        let info = config.connection_info()?;
        let url = config.to_url()?;
        let client =
            Client::open(info).map_err(|e| Error::InvalidConfig(format!("{}: {}", url, e)))?;
        Ok(Self { client })
    }

    /// Get a ConnectionManager for async operations with auto-reconnection.
    pub async fn get_connection_manager(&self) -> Result<ConnectionManager> {
        ConnectionManager::new(self.client.clone())
            .await
            .map_err(Error::Connection)
    }
}
