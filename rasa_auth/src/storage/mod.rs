mod config;
mod errors;
mod memory;
mod postgres;
mod redis;
mod schema_validation;
mod sqlite;
mod types;

pub use config::{DataStoreKind, StoreConfig, open_store};
pub use errors::StorageError;
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use redis::{CompositeStore, RedisSessionStore};
pub use sqlite::SqliteStore;
pub use types::{AuthStore, SessionRecord, SessionStore};

pub(crate) use config::DB_TABLE_ADMIN_USERS;
pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
