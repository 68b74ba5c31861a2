use chrono::{DateTime, Duration, Utc};

use crate::session::config::{SESSION_COOKIE_MAX_AGE, SESSION_TOKEN_BYTES};
use crate::session::errors::SessionError;
use crate::session::types::{SessionToken, SessionUser, ValidatedSession};
use crate::storage::{AuthStore, SessionRecord, SessionStore};
use crate::utils::gen_random_hex;

/// Issues a new session for `user_id`, valid for `SESSION_COOKIE_MAX_AGE` seconds.
///
/// A user may hold any number of concurrent sessions.
pub async fn create_session<S>(store: &S, user_id: i64) -> Result<SessionToken, SessionError>
where
    S: SessionStore + ?Sized,
{
    create_session_at(store, user_id, Utc::now()).await
}

/// Same as [`create_session`] with an explicit issue time.
#[tracing::instrument(skip(store))]
pub async fn create_session_at<S>(
    store: &S,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<SessionToken, SessionError>
where
    S: SessionStore + ?Sized,
{
    let token = gen_random_hex(SESSION_TOKEN_BYTES)?;
    let record = SessionRecord {
        token: token.clone(),
        user_id,
        expires_at: now + session_ttl(),
        created_at: now,
    };

    store.insert_session(&record).await.inspect_err(|e| {
        tracing::error!("Failed to store session for user {}: {}", user_id, e);
    })?;

    tracing::debug!("Session created for user {}, expires at {}", user_id, record.expires_at);
    Ok(SessionToken::new(token))
}

/// Resolves a token to its user id if the session exists and has not expired.
///
/// Unknown and expired tokens both give `Ok(None)`. Only store failures are errors.
pub async fn validate_session<S>(
    store: &S,
    token: &str,
) -> Result<Option<ValidatedSession>, SessionError>
where
    S: SessionStore + ?Sized,
{
    validate_session_at(store, token, Utc::now()).await
}

/// Same as [`validate_session`] with an explicit clock.
#[tracing::instrument(skip(store, token))]
pub async fn validate_session_at<S>(
    store: &S,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<ValidatedSession>, SessionError>
where
    S: SessionStore + ?Sized,
{
    if token.is_empty() {
        return Ok(None);
    }

    let Some(record) = store.get_session(token).await? else {
        tracing::debug!("Session not found");
        return Ok(None);
    };

    if !record.is_active_at(now) {
        tracing::debug!("Session for user {} expired at {}", record.user_id, record.expires_at);
        return Ok(None);
    }

    Ok(Some(ValidatedSession {
        user_id: record.user_id,
        expires_at: record.expires_at,
    }))
}

/// Resolves a token all the way to an active admin user.
///
/// Gives `None` when the session is invalid, the user no longer exists, or the
/// user has been deactivated.
#[tracing::instrument(skip(store, token))]
pub async fn get_admin_from_session<S>(
    store: &S,
    token: &str,
) -> Result<Option<SessionUser>, SessionError>
where
    S: AuthStore + ?Sized,
{
    let Some(session) = validate_session(store, token).await? else {
        return Ok(None);
    };

    match store.get_user(session.user_id).await? {
        Some(user) if user.is_active => Ok(Some(SessionUser::from(user))),
        Some(_) => {
            tracing::debug!("User {} is inactive", session.user_id);
            Ok(None)
        }
        None => {
            tracing::debug!("User {} referenced by session no longer exists", session.user_id);
            Ok(None)
        }
    }
}

/// Deletes a session. Revoking an unknown token succeeds.
#[tracing::instrument(skip(store, token))]
pub async fn revoke_session<S>(store: &S, token: &str) -> Result<(), SessionError>
where
    S: SessionStore + ?Sized,
{
    if token.is_empty() {
        return Ok(());
    }
    store.delete_session(token).await?;
    Ok(())
}

/// Deletes every session belonging to `user_id`, returning how many were removed.
#[tracing::instrument(skip(store))]
pub async fn revoke_user_sessions<S>(store: &S, user_id: i64) -> Result<u64, SessionError>
where
    S: SessionStore + ?Sized,
{
    let removed = store.delete_sessions_by_user(user_id).await?;
    tracing::info!("Revoked {} session(s) for user {}", removed, user_id);
    Ok(removed)
}

/// Physically removes expired sessions. Validation never depends on this running.
pub async fn sweep_expired_sessions<S>(store: &S) -> Result<u64, SessionError>
where
    S: SessionStore + ?Sized,
{
    sweep_expired_sessions_at(store, Utc::now()).await
}

#[tracing::instrument(skip(store))]
pub async fn sweep_expired_sessions_at<S>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<u64, SessionError>
where
    S: SessionStore + ?Sized,
{
    let removed = store.delete_expired_sessions(now).await?;
    if removed > 0 {
        tracing::info!("Swept {} expired session(s)", removed);
    }
    Ok(removed)
}

/// Sessions of `user_id` that are still valid, soonest to expire first.
pub async fn list_active_sessions<S>(
    store: &S,
    user_id: i64,
) -> Result<Vec<SessionRecord>, SessionError>
where
    S: SessionStore + ?Sized,
{
    let now = Utc::now();
    let mut sessions: Vec<SessionRecord> = store
        .list_sessions_by_user(user_id)
        .await?
        .into_iter()
        .filter(|s| s.is_active_at(now))
        .collect();
    sessions.sort_by_key(|s| s.expires_at);
    Ok(sessions)
}

fn session_ttl() -> Duration {
    Duration::seconds(*SESSION_COOKIE_MAX_AGE as i64)
}
