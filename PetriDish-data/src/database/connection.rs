//! Database connection module for the PetriDish application
//!
//! This module reads the store configuration from the environment and opens
//! the collection every handler writes to. Two backends are supported:
//! - MongoDB (default)
//! - In-memory (local runs and tests)

use std::env;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, Credential};
use mongodb::Client;

use crate::repository::{InMemoryRecordRepository, MongoRecordRepository, RecordRepositoryTrait};

/// Default database name
pub const DEFAULT_DATABASE: &str = "petri_dish";

/// Default collection holding both record shapes
pub const DEFAULT_COLLECTION: &str = "patients";

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// MongoDB deployment reached through `MONGODB_URI`
    MongoDb,
    /// Process-local store, lost on exit
    InMemory,
}

impl DatabaseType {
    /// Convert from string to database type
    pub fn from_str(s: &str) -> Result<Self, DatabaseError> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(DatabaseType::MongoDb),
            "memory" | "in-memory" | "in_memory" => Ok(DatabaseType::InMemory),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Connecting to or pinging the server failed
    #[error("Failed to connect to MongoDB: {0}")]
    Connection(#[from] mongodb::error::Error),
}

/// Database configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Backend to use
    pub db_type: DatabaseType,
    /// MongoDB connection string
    pub uri: Option<String>,
    /// Username for authentication
    pub username: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_type", &self.db_type)
            .field("uri", &self.uri.as_ref().map(|_| "<set>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::MongoDb,
            uri: None,
            username: None,
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let db_type = match var("DB_TYPE") {
            Some(value) => DatabaseType::from_str(&value)?,
            None => DatabaseType::MongoDb,
        };

        let uri = var("MONGODB_URI");
        if db_type == DatabaseType::MongoDb && uri.is_none() {
            return Err(DatabaseError::EnvVarNotFound("MONGODB_URI".to_string()));
        }

        let config = Self {
            db_type,
            uri,
            username: var("MONGODB_USERNAME"),
            password: var("MONGODB_PASSWORD"),
            database: var("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: var("MONGODB_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        };

        info!(
            "Database configuration: type={:?}, database={}, collection={}",
            config.db_type, config.database, config.collection
        );

        Ok(config)
    }
}

/// Connect to MongoDB and verify the server answers a ping
pub async fn connect(
    uri: &str,
    username: Option<&str>,
    password: Option<&str>,
    database: &str,
) -> Result<mongodb::Database, DatabaseError> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some("petri_dish".to_string());

    if let Some(username) = username {
        debug!("Authenticating to MongoDB as {}", username);
        options.credential = Some(
            Credential::builder()
                .username(username.to_string())
                .password(password.map(str::to_string))
                .build(),
        );
    }

    let client = Client::with_options(options)?;
    let database = client.database(database);
    database.run_command(doc! { "ping": 1 }, None).await?;

    info!("Connected to MongoDB database {}", database.name());
    Ok(database)
}

/// Open the configured backend and hand back a shared repository handle
pub async fn connect_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn RecordRepositoryTrait>, DatabaseError> {
    match config.db_type {
        DatabaseType::MongoDb => {
            let uri = config
                .uri
                .as_deref()
                .ok_or_else(|| DatabaseError::EnvVarNotFound("MONGODB_URI".to_string()))?;
            let database = connect(
                uri,
                config.username.as_deref(),
                config.password.as_deref(),
                &config.database,
            )
            .await?;
            let collection = database.collection::<Document>(&config.collection);
            Ok(Arc::new(MongoRecordRepository::new(database, collection)))
        }
        DatabaseType::InMemory => {
            info!("Using in-memory record store");
            Ok(Arc::new(InMemoryRecordRepository::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!(DatabaseType::from_str("MongoDB").unwrap(), DatabaseType::MongoDb);
        assert_eq!(DatabaseType::from_str("memory").unwrap(), DatabaseType::InMemory);
        assert!(matches!(
            DatabaseType::from_str("sqlite"),
            Err(DatabaseError::UnsupportedDatabaseType(_))
        ));
    }

    #[test]
    fn test_config_requires_uri_for_mongodb() {
        let result = DatabaseConfig::from_lookup(lookup(&[("MONGODB_USERNAME", "admin")]));
        assert!(matches!(
            result,
            Err(DatabaseError::EnvVarNotFound(ref var)) if var == "MONGODB_URI"
        ));
    }

    #[test]
    fn test_config_reads_credentials_and_defaults() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("MONGODB_USERNAME", "admin"),
            ("MONGODB_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.db_type, DatabaseType::MongoDb);
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.database, "petri_dish");
        assert_eq!(config.collection, "patients");
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_memory_backend_needs_no_uri() {
        let config =
            DatabaseConfig::from_lookup(lookup(&[("DB_TYPE", "memory"), ("MONGODB_USERNAME", "")]))
                .unwrap();
        assert_eq!(config.db_type, DatabaseType::InMemory);
        assert!(config.uri.is_none());
        assert!(config.username.is_none());
    }

    #[tokio::test]
    async fn test_connect_repository_in_memory() {
        let config = DatabaseConfig {
            db_type: DatabaseType::InMemory,
            ..Default::default()
        };
        let repository = connect_repository(&config).await.unwrap();
        assert!(repository.ping().await.is_ok());
        assert!(repository.find_all().await.unwrap().is_empty());
    }
}
