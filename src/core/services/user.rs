use crate::core::models::user::{validate_email, validate_password, Create, Insert, Patch, Profile, Role, Update, User};
use crate::core::models::common::require_text;
use crate::core::ports::repository::{Store, UserCommon};
use crate::error::Error;
use hex::ToHex;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

async fn ensure_email_free<S>(store: &mut S, email: &str, owner: Option<i32>) -> Result<(), Error>
where
    S: Store,
{
    match UserCommon::get_by_email(store, email).await? {
        Some(u) if Some(u.id) != owner => Err(Error::Conflict(format!("email {} already registered", email))),
        _ => Ok(()),
    }
}

pub async fn create_user<S>(store: &mut S, user: Create) -> Result<i32, Error>
where
    S: Store,
{
    user.validate()?;
    let email = user.email.trim().to_lowercase();
    ensure_email_free(store, &email, None).await?;
    let salt = random_salt();
    let id = UserCommon::insert(
        store,
        Insert {
            name: user.name,
            email,
            password: hash_password(&user.password, &salt),
            salt,
            role: user.role,
        },
    )
    .await?;
    log::info!("user {} created with role {}", id, user.role);
    Ok(id)
}

/// Only the fields present are changed; a new password gets a new salt.
pub async fn update_user<S>(store: &mut S, id: i32, user: Update) -> Result<(), Error>
where
    S: Store,
{
    UserCommon::get(store, id).await?;
    let mut patch = Patch::default();
    if let Some(name) = user.name {
        require_text("name", &name)?;
        patch.name = Some(name);
    }
    if let Some(email) = user.email {
        validate_email(&email)?;
        let email = email.trim().to_lowercase();
        ensure_email_free(store, &email, Some(id)).await?;
        patch.email = Some(email);
    }
    if let Some(password) = user.password {
        validate_password(&password)?;
        let salt = random_salt();
        patch.password = Some(hash_password(&password, &salt));
        patch.salt = Some(salt);
    }
    patch.role = user.role;
    UserCommon::patch(store, id, patch).await
}

pub async fn list_users<S>(store: &mut S) -> Result<Vec<Profile>, Error>
where
    S: Store,
{
    let users = UserCommon::query(store).await?;
    Ok(users.into_iter().map(Profile::from).collect())
}

/// An administrator cannot delete their own account.
pub async fn delete_user<S>(store: &mut S, acting_uid: i32, id: i32) -> Result<(), Error>
where
    S: Store,
{
    if acting_uid == id {
        return Err(Error::Forbidden);
    }
    UserCommon::delete(store, id).await
}

pub async fn login<S>(store: &mut S, email: &str, password: &str) -> Result<User, Error>
where
    S: Store,
{
    match UserCommon::get_by_email(store, &email.trim().to_lowercase()).await? {
        Some(user) if hash_password(password, &user.salt) == user.password => Ok(user),
        _ => Err(Error::Unauthorized),
    }
}

/// Creates the first administrator when no account uses `email` yet.
pub async fn ensure_admin<S>(store: &mut S, email: &str, password: &str) -> Result<(), Error>
where
    S: Store,
{
    if UserCommon::get_by_email(store, &email.trim().to_lowercase()).await?.is_some() {
        return Ok(());
    }
    create_user(
        store,
        Create {
            name: "Administrador".into(),
            email: email.into(),
            password: password.into(),
            confirm_password: password.into(),
            role: Role::Admin,
        },
    )
    .await?;
    Ok(())
}
