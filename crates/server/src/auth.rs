//! Registration, login, and bearer-token verification.
//!
//! Tokens are HS256 JWTs carrying the user id and email, valid for 24 hours.
//! Password hashes are argon2; the engine only ever sees the opaque hash.

use api_types::auth::{AuthResponse, AuthUserView, LoginRequest, RegisterRequest};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{extract::State, Json};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::{server::ServerState, success, ServerError, Success};
use engine::users;

const TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

const MIN_USERNAME_LEN: usize = 2;
const MAX_USERNAME_LEN: usize = 50;

const DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "temp-mail.org",
    "mailinator.com",
    "guerrillamail.com",
    "tempmail.com",
];

const COMMON_PASSWORDS: &[&str] = &["password", "password123", "admin", "12345678"];

/// The authenticated caller, resolved by the middleware and carried as a
/// request extension.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    email: String,
    exp: i64,
}

fn issue_token(secret: &str, user_id: i64, email: &str) -> Result<String, ServerError> {
    let claims = Claims {
        user_id,
        email: email.to_string(),
        exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| ServerError::Internal(format!("failed to sign token: {err}")))
}

pub(crate) fn verify_token(secret: &str, token: &str) -> Result<AuthUser, ServerError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ServerError::unauthorized("INVALID_TOKEN", "invalid or expired token"))?;

    Ok(AuthUser {
        id: data.claims.user_id,
        email: data.claims.email,
    })
}

pub(crate) fn check_username(username: &str) -> Result<(), ServerError> {
    let len = username.trim().chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ServerError::bad_request(
            "VALIDATION_ERROR",
            format!("username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"),
        ));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ServerError> {
    let invalid = || ServerError::bad_request("VALIDATION_ERROR", "invalid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }

    if DISPOSABLE_DOMAINS.contains(&domain.to_lowercase().as_str()) {
        return Err(ServerError::bad_request(
            "DISPOSABLE_EMAIL",
            "disposable email addresses are not allowed",
        ));
    }

    Ok(())
}

fn check_password(password: &str) -> Result<(), ServerError> {
    let weak = |message: &str| ServerError::bad_request("WEAK_PASSWORD", message.to_string());

    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        return Err(weak("password is too common"));
    }
    if password.chars().count() < 8 {
        return Err(weak("password must be at least 8 characters"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(weak("password must contain a lowercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(weak("password must contain an uppercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(weak("password must contain a digit"));
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(weak("password must contain a special character"));
    }

    Ok(())
}

fn hash_password(password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| ServerError::Internal(format!("failed to hash password: {err}")))?
        .to_string())
}

fn verify_password(hash: &str, password: &str) -> Result<(), ServerError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| ServerError::Internal(format!("stored password hash is invalid: {err}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ServerError::unauthorized("INVALID_CREDENTIALS", "invalid email or password"))
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Success<AuthResponse>>, ServerError> {
    let username = payload.username.trim();
    let email = payload.email.trim();

    check_username(username)?;
    check_email(email)?;
    check_password(&payload.password)?;

    let email_norm = email.to_lowercase();
    let existing = users::Entity::find()
        .filter(users::Column::EmailNorm.eq(email_norm.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ServerError::bad_request(
            "EMAIL_EXISTS",
            "an account with this email already exists",
        ));
    }

    let user = users::ActiveModel {
        username: ActiveValue::Set(username.to_string()),
        email: ActiveValue::Set(email.to_string()),
        email_norm: ActiveValue::Set(email_norm),
        password_hash: ActiveValue::Set(hash_password(&payload.password)?),
        full_name: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    let user = users::Entity::insert(user)
        .exec_with_returning(&state.db)
        .await?;

    tracing::info!(user_id = user.id, "user registered");

    let token = issue_token(&state.jwt_secret, user.id, &user.email)?;
    Ok(success(AuthResponse {
        token,
        user: AuthUserView {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Success<AuthResponse>>, ServerError> {
    let email_norm = payload.email.trim().to_lowercase();
    let user = users::Entity::find()
        .filter(users::Column::EmailNorm.eq(email_norm))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ServerError::unauthorized("INVALID_CREDENTIALS", "invalid email or password")
        })?;

    verify_password(&user.password_hash, &payload.password)?;

    let token = issue_token(&state.jwt_secret, user.id, &user.email)?;
    Ok(success(AuthResponse {
        token,
        user: AuthUserView {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        let token = issue_token("secret", 42, "alice@example.com").unwrap();
        let user = verify_token("secret", &token).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.email, "alice@example.com");

        assert!(verify_token("other-secret", &token).is_err());
        assert!(verify_token("secret", "not-a-token").is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(check_email("alice@example.com").is_ok());
        assert!(check_email("alice.example.com").is_err());
        assert!(check_email("@example.com").is_err());
        assert!(check_email("alice@example").is_err());
        assert!(check_email("alice @example.com").is_err());
    }

    #[test]
    fn disposable_domains_are_rejected() {
        let err = check_email("bob@Mailinator.com").unwrap_err();
        assert!(matches!(
            err,
            ServerError::BadRequest {
                code: "DISPOSABLE_EMAIL",
                ..
            }
        ));
    }

    #[test]
    fn password_policy_is_enforced() {
        assert!(check_password("Str0ng!pass").is_ok());
        assert!(check_password("short1!").is_err());
        assert!(check_password("nouppercase1!").is_err());
        assert!(check_password("NOLOWERCASE1!").is_err());
        assert!(check_password("NoDigits!!").is_err());
        assert!(check_password("NoSpecial11").is_err());
        assert!(check_password("Password123").is_err());
    }

    #[test]
    fn common_passwords_are_rejected_case_insensitively() {
        let err = check_password("PASSWORD123").unwrap_err();
        assert!(matches!(
            err,
            ServerError::BadRequest {
                code: "WEAK_PASSWORD",
                ..
            }
        ));
    }
}
