//! Store selection and table naming

use std::env;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use super::errors::StorageError;
use super::memory::InMemoryStore;
use super::postgres::PostgresStore;
use super::redis::{CompositeStore, RedisSessionStore};
use super::sqlite::SqliteStore;
use super::types::{AuthStore, SessionStore};
use crate::userdb::AdminUserStore;

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "rasa_".to_string()));

/// Admin users table name
pub static DB_TABLE_ADMIN_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_ADMIN_USERS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "admin_users"))
});

/// Admin sessions table name
pub static DB_TABLE_ADMIN_SESSIONS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_ADMIN_SESSIONS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "admin_sessions"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStoreKind {
    Memory,
    Sqlite,
    Postgres,
}

impl FromStr for DataStoreKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(StorageError::UnsupportedStoreType(format!(
                "{other}. Supported types are 'memory', 'sqlite' and 'postgres'"
            ))),
        }
    }
}

/// Where admin users and sessions live.
///
/// Sessions go to the data store unless a Redis URL is given, in which case
/// they are kept in Redis and only admin users stay in the data store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_store_type: DataStoreKind,
    pub data_store_url: String,
    pub session_cache_url: Option<String>,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            data_store_type: DataStoreKind::Memory,
            data_store_url: String::new(),
            session_cache_url: None,
        }
    }

    /// Reads `GENERIC_DATA_STORE_TYPE`, `GENERIC_DATA_STORE_URL`,
    /// `GENERIC_CACHE_STORE_TYPE` and `GENERIC_CACHE_STORE_URL`.
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, StorageError> {
        let data_store_type = lookup("GENERIC_DATA_STORE_TYPE")
            .map(|s| s.parse::<DataStoreKind>())
            .transpose()?
            .unwrap_or(DataStoreKind::Memory);

        let data_store_url =
            lookup("GENERIC_DATA_STORE_URL").unwrap_or_else(|| "sqlite::memory:".to_string());

        let session_cache_url = match lookup("GENERIC_CACHE_STORE_TYPE").as_deref() {
            None | Some("") | Some("none") => None,
            Some("redis") => Some(lookup("GENERIC_CACHE_STORE_URL").ok_or_else(|| {
                StorageError::Storage(
                    "GENERIC_CACHE_STORE_URL must be set when GENERIC_CACHE_STORE_TYPE=redis"
                        .to_string(),
                )
            })?),
            Some(other) => {
                return Err(StorageError::UnsupportedStoreType(format!(
                    "{other}. Supported cache store type is 'redis'"
                )));
            }
        };

        Ok(Self {
            data_store_type,
            data_store_url,
            session_cache_url,
        })
    }
}

/// Opens the configured store and creates or validates its tables.
#[tracing::instrument(skip(config), fields(store_type = ?config.data_store_type))]
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn AuthStore>, StorageError> {
    tracing::info!(
        "Initializing data store with type: {:?}, session cache: {}",
        config.data_store_type,
        if config.session_cache_url.is_some() {
            "redis"
        } else {
            "none"
        }
    );

    match config.data_store_type {
        DataStoreKind::Memory => with_session_backend(InMemoryStore::new(), config).await,
        DataStoreKind::Sqlite => {
            with_session_backend(SqliteStore::connect(&config.data_store_url).await?, config).await
        }
        DataStoreKind::Postgres => {
            with_session_backend(PostgresStore::connect(&config.data_store_url)?, config).await
        }
    }
}

async fn with_session_backend<S>(
    store: S,
    config: &StoreConfig,
) -> Result<Arc<dyn AuthStore>, StorageError>
where
    S: AuthStore + 'static,
{
    let store: Arc<dyn AuthStore> = match &config.session_cache_url {
        Some(url) => {
            let sessions = RedisSessionStore::connect(url)?;
            Arc::new(CompositeStore::new(Arc::new(sessions), Arc::new(store)))
        }
        None => Arc::new(store),
    };

    store
        .init_users()
        .await
        .map_err(|e| StorageError::Storage(e.to_string()))?;
    store.init_sessions().await?;

    tracing::info!("Auth store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_data_store_kind_parse() {
        assert_eq!("memory".parse::<DataStoreKind>().unwrap(), DataStoreKind::Memory);
        assert_eq!("SQLite".parse::<DataStoreKind>().unwrap(), DataStoreKind::Sqlite);
        assert_eq!(
            "postgresql".parse::<DataStoreKind>().unwrap(),
            DataStoreKind::Postgres
        );
        assert!(matches!(
            "mysql".parse::<DataStoreKind>(),
            Err(StorageError::UnsupportedStoreType(_))
        ));
    }

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_store_type, DataStoreKind::Memory);
        assert_eq!(config.data_store_url, "sqlite::memory:");
        assert_eq!(config.session_cache_url, None);
    }

    #[test]
    fn test_store_config_sqlite_with_redis() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("GENERIC_DATA_STORE_TYPE", "sqlite"),
            ("GENERIC_DATA_STORE_URL", "sqlite:/tmp/rasa.db"),
            ("GENERIC_CACHE_STORE_TYPE", "redis"),
            ("GENERIC_CACHE_STORE_URL", "redis://127.0.0.1:6379"),
        ]))
        .unwrap();

        assert_eq!(config.data_store_type, DataStoreKind::Sqlite);
        assert_eq!(config.data_store_url, "sqlite:/tmp/rasa.db");
        assert_eq!(
            config.session_cache_url.as_deref(),
            Some("redis://127.0.0.1:6379")
        );
    }

    #[test]
    fn test_store_config_redis_requires_url() {
        let result =
            StoreConfig::from_lookup(lookup_from(&[("GENERIC_CACHE_STORE_TYPE", "redis")]));
        assert!(matches!(result, Err(StorageError::Storage(_))));
    }

    #[test]
    fn test_store_config_unknown_cache_type() {
        let result =
            StoreConfig::from_lookup(lookup_from(&[("GENERIC_CACHE_STORE_TYPE", "memcached")]));
        assert!(matches!(result, Err(StorageError::UnsupportedStoreType(_))));
    }

    #[test]
    fn test_default_table_names() {
        // Only meaningful when the overrides are not set in the test environment
        if env::var("DB_TABLE_PREFIX").is_err()
            && env::var("DB_TABLE_ADMIN_USERS").is_err()
            && env::var("DB_TABLE_ADMIN_SESSIONS").is_err()
        {
            assert_eq!(DB_TABLE_ADMIN_USERS.as_str(), "rasa_admin_users");
            assert_eq!(DB_TABLE_ADMIN_SESSIONS.as_str(), "rasa_admin_sessions");
        }
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&StoreConfig::memory()).await.unwrap();
        assert!(store.get_session("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_sqlite_memory_store() {
        let config = StoreConfig {
            data_store_type: DataStoreKind::Sqlite,
            data_store_url: "sqlite::memory:".to_string(),
            session_cache_url: None,
        };
        let store = open_store(&config).await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());
    }
}
