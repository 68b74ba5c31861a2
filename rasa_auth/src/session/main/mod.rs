mod cookie;
mod session;

pub use cookie::{
    clear_session_cookie, decode_session_cookie, encode_session_cookie, header_set_cookie,
    session_token_from_headers,
};
pub use session::{
    create_session, create_session_at, get_admin_from_session, list_active_sessions,
    revoke_session, revoke_user_sessions, sweep_expired_sessions, sweep_expired_sessions_at,
    validate_session, validate_session_at,
};
