use crate::credential::hash_password;
use crate::session::{list_active_sessions, revoke_user_sessions};
use crate::storage::{AuthStore, SessionRecord};
use crate::userdb::{AdminUser, NewAdminUser};

use super::errors::CoordinationError;

/// Creates an admin account. A taken email gives `Conflict`.
#[tracing::instrument(skip(store, password))]
pub async fn create_admin_user<S>(
    store: &S,
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<AdminUser, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(CoordinationError::InvalidInput(format!("Invalid email: {email:?}")).log());
    }

    let password_hash = hash_password(password)?;
    let user = store
        .insert_user(NewAdminUser::new(email, &password_hash, name))
        .await?;

    tracing::info!("Created admin user {} ({})", user.id, user.email);
    Ok(user)
}

pub async fn get_admin_user<S>(
    store: &S,
    user_id: i64,
) -> Result<Option<AdminUser>, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    Ok(store.get_user(user_id).await?)
}

pub async fn list_admin_users<S>(store: &S) -> Result<Vec<AdminUser>, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    Ok(store.list_users().await?)
}

/// Replaces an admin's password and logs them out everywhere.
#[tracing::instrument(skip(store, new_password))]
pub async fn change_admin_password<S>(
    store: &S,
    user_id: i64,
    new_password: &str,
) -> Result<(), CoordinationError>
where
    S: AuthStore + ?Sized,
{
    let mut user = require_user(store, user_id).await?;
    user.password_hash = hash_password(new_password)?;
    store.update_user(&user).await?;
    revoke_user_sessions(store, user_id).await?;

    tracing::info!("Password changed for admin user {}", user_id);
    Ok(())
}

/// Enables or disables an admin. Disabling also revokes all of their sessions.
#[tracing::instrument(skip(store))]
pub async fn set_admin_active<S>(
    store: &S,
    user_id: i64,
    active: bool,
) -> Result<AdminUser, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    let mut user = require_user(store, user_id).await?;
    user.is_active = active;
    let user = store.update_user(&user).await?;

    if !active {
        revoke_user_sessions(store, user_id).await?;
    }

    tracing::info!("Admin user {} active={}", user_id, active);
    Ok(user)
}

/// Deletes an admin together with their sessions.
#[tracing::instrument(skip(store))]
pub async fn delete_admin_user<S>(store: &S, user_id: i64) -> Result<(), CoordinationError>
where
    S: AuthStore + ?Sized,
{
    require_user(store, user_id).await?;
    revoke_user_sessions(store, user_id).await?;
    store.delete_user(user_id).await?;

    tracing::info!("Deleted admin user {}", user_id);
    Ok(())
}

/// Unexpired sessions of an admin.
pub async fn list_admin_sessions<S>(
    store: &S,
    user_id: i64,
) -> Result<Vec<SessionRecord>, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    Ok(list_active_sessions(store, user_id).await?)
}

async fn require_user<S>(store: &S, user_id: i64) -> Result<AdminUser, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    store.get_user(user_id).await?.ok_or_else(|| {
        CoordinationError::ResourceNotFound {
            resource_type: "AdminUser".to_string(),
            resource_id: user_id.to_string(),
        }
        .log()
    })
}
