use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{Json, extract::State, http::StatusCode};
use libsql::Connection;
use password_hash::rand_core::OsRng;
use tower_sessions::Session;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::*;
use crate::error::AppError;
use crate::models::{LoginPayload, PublicUser, RegisterPayload, User};
use crate::{AppState, Db, with_transaction};

pub fn validate_username(username: &str) -> Result<(), AppError> {
    let length = username.trim().chars().count();
    if length < MIN_USERNAME_LENGTH || length > MAX_USERNAME_LENGTH {
        return Err(AppError::invalid_field(
            "username",
            format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            ),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_field(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::internal("failed to hash password"))
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

async fn find_user(conn: &Connection, username: &str) -> Result<Option<User>, AppError> {
    let mut rows = conn
        .query(
            "SELECT id, name, password_hash FROM users WHERE name = ?",
            [username],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })),
        None => Ok(None),
    }
}

pub async fn get_user_by_username(db: &Db, username: &str) -> Result<Option<User>, AppError> {
    let conn = db.read().await;
    find_user(&conn, username).await
}

/// Insert a new account, failing with `Conflict` when the name is taken.
///
/// The name check and the insert share one transaction, so concurrent
/// registrations of the same name yield exactly one account.
pub async fn create_user(db: &Db, username: &str, password: &str) -> Result<User, AppError> {
    let username = username.trim();
    validate_username(username)?;
    validate_password(password)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        password_hash: hash_password(password)?,
    };

    let user = with_transaction(db, move |conn| {
        Box::pin(async move {
            if find_user(conn, &user.username).await?.is_some() {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }

            conn.execute(
                "INSERT INTO users (id, name, password_hash) VALUES (?, ?, ?)",
                (
                    user.id.as_str(),
                    user.username.as_str(),
                    user.password_hash.as_str(),
                ),
            )
            .await?;

            Ok::<User, AppError>(user)
        })
    })
    .await?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// The identity every debt operation is scoped to
pub async fn get_current_user(session: &Session) -> Result<PublicUser, AppError> {
    session
        .get::<PublicUser>(SESSION_USER_KEY)
        .await
        .map_err(|_| AppError::internal(ERR_INVALID_SESSION))?
        .ok_or(AppError::Unauthorized)
}

pub async fn register(
    State(app_state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = create_user(&app_state.db, &payload.username, &payload.password).await?;
    let public_user = PublicUser::from(user);

    session
        .cycle_id()
        .await
        .map_err(|_| AppError::internal(ERR_INVALID_SESSION))?;
    session
        .insert(SESSION_USER_KEY, &public_user)
        .await
        .map_err(|_| AppError::internal(ERR_INVALID_SESSION))?;

    Ok((StatusCode::CREATED, Json(public_user)))
}

pub async fn login(
    State(app_state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = get_user_by_username(&app_state.db, payload.username.trim())
        .await?
        .filter(|user| verify_password(&payload.password, &user.password_hash));

    let Some(user) = user else {
        warn!(username = %payload.username.trim(), "failed login attempt");
        return Err(AppError::InvalidCredentials);
    };
    let public_user = PublicUser::from(user);

    // Fresh session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|_| AppError::internal(ERR_INVALID_SESSION))?;
    session
        .insert(SESSION_USER_KEY, &public_user)
        .await
        .map_err(|_| AppError::internal(ERR_INVALID_SESSION))?;

    Ok((StatusCode::OK, Json(public_user)))
}

pub async fn me(session: Session) -> Result<Json<PublicUser>, AppError> {
    let user = get_current_user(&session).await?;
    Ok(Json(user))
}

pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    session
        .flush()
        .await
        .map_err(|_| AppError::internal(ERR_INVALID_SESSION))?;
    Ok(StatusCode::NO_CONTENT)
}
