//! rasa_auth - admin authentication for the Rasa Bakery storefront
//!
//! Salted password hashing, opaque cookie sessions backed by a pluggable
//! store, and the login/logout flows that tie them together. Framework
//! integrations live in separate crates.

mod config;
mod coordination;
mod credential;
mod session;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::RASA_AUTH_ROUTE_PREFIX;

pub use coordination::{
    CoordinationError, LoginRequest, authenticate_request, change_admin_password,
    create_admin_user, delete_admin_user, get_admin_user, list_admin_sessions, list_admin_users,
    login_core, logout_core, set_admin_active,
};

pub use credential::{CredentialError, StoredHash, hash_password, verify_password};

pub use session::{
    SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SessionError, SessionToken, SessionUser,
    ValidatedSession, clear_session_cookie, create_session, create_session_at,
    decode_session_cookie, encode_session_cookie, get_admin_from_session, header_set_cookie,
    list_active_sessions, revoke_session, revoke_user_sessions, session_token_from_headers,
    sweep_expired_sessions, sweep_expired_sessions_at, validate_session, validate_session_at,
};

pub use storage::{
    AuthStore, CompositeStore, DataStoreKind, InMemoryStore, PostgresStore, RedisSessionStore,
    SessionRecord, SessionStore, SqliteStore, StorageError, StoreConfig, open_store,
};

pub use userdb::{AdminUser, AdminUserStore, NewAdminUser, UserError};

pub use utils::{UtilError, gen_random_hex};
