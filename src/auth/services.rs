use base64ct::{Base64, Encoding};
use tracing::{debug, error, info, warn};

use crate::auth::{
    dto::PublicUser,
    password::{hash_blocking, verify_blocking},
    repo_types::User,
};
use crate::store::{StoreError, UserStore};
use crate::validation::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Username {0} already exists")]
    UsernameTaken(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid old password")]
    InvalidOldPassword,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        UserError::Internal(err.into())
    }
}

/// Splits a `Basic <base64(user:pass)>` header value. The password may
/// itself contain `:`.
pub(crate) fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, payload) = header.split_once(' ')?;
    if scheme != "Basic" || payload.is_empty() || payload.contains(' ') {
        return None;
    }
    let decoded = Base64::decode_vec(payload).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Resolves the caller from an `Authorization` header. Every failure,
/// including a store error, is reported as `None`.
pub async fn authenticate(users: &dyn UserStore, header: Option<&str>) -> Option<User> {
    let (username, password) = parse_basic(header?)?;

    let user = match users.find_user_by_username(&username).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "find_user_by_username failed during authentication");
            return None;
        }
    };

    let stored = user.as_ref().map(|u| u.password_hash.clone());
    match verify_blocking(password, stored).await {
        Ok(true) => {
            debug!(username = %username, "basic credentials verified");
            user
        }
        Ok(false) => None,
        Err(e) => {
            error!(error = %e, "verify_password failed during authentication");
            None
        }
    }
}

pub async fn signup(users: &dyn UserStore, creds: Credentials) -> Result<PublicUser, UserError> {
    let hash = hash_blocking(creds.password).await?;

    let user = match users.create_user(&creds.username, &hash).await {
        Ok(user) => user,
        Err(StoreError::Conflict(constraint)) => {
            warn!(username = %creds.username, %constraint, "username already exists");
            return Err(UserError::UsernameTaken(creds.username));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, username = %user.username, "user signed up");
    Ok(user.into())
}

pub async fn login(users: &dyn UserStore, creds: Credentials) -> Result<PublicUser, UserError> {
    let user = users.find_user_by_username(&creds.username).await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());

    if !verify_blocking(creds.password, stored).await? {
        warn!(username = %creds.username, "login with invalid credentials");
        return Err(UserError::InvalidCredentials);
    }
    let user = user.ok_or(UserError::InvalidCredentials)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(user.into())
}

pub async fn reset_password(
    users: &dyn UserStore,
    user: &User,
    old_password: String,
    new_password: String,
) -> Result<(), UserError> {
    if !verify_blocking(old_password, Some(user.password_hash.clone())).await? {
        warn!(user_id = %user.id, "reset with invalid old password");
        return Err(UserError::InvalidOldPassword);
    }

    let hash = hash_blocking(new_password).await?;
    users.update_password_hash(&user.id, &hash).await?;

    info!(user_id = %user.id, "password updated");
    Ok(())
}
