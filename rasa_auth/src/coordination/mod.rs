//! Login, logout and admin management flows built on the credential, session
//! and user database layers.

mod admin;
mod auth;
mod errors;

pub use admin::{
    change_admin_password, create_admin_user, delete_admin_user, get_admin_user,
    list_admin_sessions, list_admin_users, set_admin_active,
};
pub use auth::{LoginRequest, authenticate_request, login_core, logout_core};
pub use errors::CoordinationError;
