//! Password hashing, JWT session tokens, and the session handlers.
//!
//! A successful login stores a JWT in the signed, http-only `coderCookie`
//! cookie. The `unprotected*` pair does the same with an unsigned cookie and a
//! token carrying the whole public profile, kept for comparison.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use axum::{
    Extension, Json,
    extract::{FromRequestParts, rejection::JsonRejection},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::{
    CookieJar, SignedCookieJar,
    cookie::{Cookie, Key},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use time::{Duration, OffsetDateTime};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{AppConfig, ConfigError},
    database::Database,
    errors::AppError,
    models::{NewUser, Role, User},
    types::{MessageResponse, PayloadResponse},
};

pub const SESSION_COOKIE: &str = "coderCookie";
pub const UNPROTECTED_COOKIE: &str = "unprotectedCookie";

/// Secrets and lifetimes used to issue and check sessions.
#[derive(Clone)]
pub struct SessionKeys {
    cookie_key: Key,
    jwt_secret: Vec<u8>,
    ttl: Duration,
    /// Marks cookies `Secure` outside development.
    secure_cookies: bool,
}

impl SessionKeys {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cookie_key: config.cookie_key()?,
            jwt_secret: config.jwt_secret.clone().into_bytes(),
            ttl: Duration::seconds(config.token_ttl_secs),
            secure_cookies: !config.is_development(),
        })
    }
}

/// JWT claims wrapping a user payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims<T> {
    #[serde(flatten)]
    pub user: T,
    pub exp: i64,
    pub iat: i64,
}

/// What the signed session cookie carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for TokenUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.full_name(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Public profile carried by the unprotected cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub pets: Vec<Uuid>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            pets: user.pets.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Incomplete values"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Incomplete values"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Incomplete values"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Incomplete values"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Incomplete values"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub payload: Uuid,
    pub message: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub user: TokenUser,
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| {
        error!("Stored password hash is unreadable: {e}");
        AppError::Internal
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_token<T: Serialize>(keys: &SessionKeys, user: T) -> Result<String, AppError> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        user,
        exp: (now + keys.ttl).unix_timestamp(),
        iat: now.unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&keys.jwt_secret),
    )
    .map_err(|e| {
        error!("Failed to sign token: {e}");
        AppError::Internal
    })
}

pub fn verify_token<T: DeserializeOwned>(
    keys: &SessionKeys,
    token: &str,
) -> Result<Claims<T>, AppError> {
    let token_data = decode::<Claims<T>>(
        token,
        &DecodingKey::from_secret(&keys.jwt_secret),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token"))?;
    Ok(token_data.claims)
}

fn session_cookie(keys: &SessionKeys, name: &'static str, token: String) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .max_age(keys.ttl)
        .http_only(true)
        .secure(keys.secure_cookies)
        .build()
}

fn validation_message(e: validator::ValidationErrors) -> AppError {
    let mut messages: Vec<String> = e
        .field_errors()
        .into_iter()
        .flat_map(|(_, errors)| {
            errors
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages.dedup();
    AppError::InvalidInput(messages.join(", "))
}

/// Unwraps a session request body; a body that isn't JSON at all counts as incomplete.
fn session_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            Err(AppError::InvalidInput("Incomplete values".to_string()))
        }
        Err(e) => Err(AppError::InvalidInput(e.body_text())),
    }
}

fn session_keys(parts: &Parts) -> Result<&SessionKeys, AppError> {
    parts.extensions.get::<SessionKeys>().ok_or_else(|| {
        error!("SessionKeys extension missing from router");
        AppError::Internal
    })
}

/// Extractor for the user behind a valid signed session cookie.
pub struct SessionUser(pub TokenUser);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let keys = session_keys(parts)?;
        let jar: SignedCookieJar =
            SignedCookieJar::from_headers(&parts.headers, keys.cookie_key.clone());
        let cookie = jar
            .get(SESSION_COOKIE)
            .ok_or(AppError::Unauthorized("No authentication token"))?;

        let claims = verify_token::<TokenUser>(keys, cookie.value())?;
        Ok(SessionUser(claims.user))
    }
}

/// Extractor for the profile behind the unsigned cookie.
pub struct UnprotectedUser(pub UserProfile);

impl<S> FromRequestParts<S> for UnprotectedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let keys = session_keys(parts)?;
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(UNPROTECTED_COOKIE)
            .ok_or(AppError::Unauthorized("No authentication token"))?;

        let claims = verify_token::<UserProfile>(keys, cookie.value())?;
        Ok(UnprotectedUser(claims.user))
    }
}

/// Looks up the user and checks the password.
async fn authenticate(db: &Database, req: &LoginRequest) -> Result<User, AppError> {
    req.validate().map_err(validation_message)?;

    let user = db
        .get_user_by_email(&req.email)
        .await?
        .ok_or(AppError::NotFound("User doesn't exist"))?;

    if !verify_password(&req.password, &user.password)? {
        return Err(AppError::InvalidInput("Incorrect password".to_string()));
    }

    Ok(user)
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/sessions/register",
    tag = "sessions",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Incomplete values or user already exists")
    )
)]
pub async fn register(
    Extension(db): Extension<Database>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let req = session_body(body)?;
    req.validate().map_err(validation_message)?;

    if db.get_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::InvalidInput("User already exists".to_string()));
    }

    let password = hash_password(&req.password).map_err(|e| {
        error!("Failed to hash password: {e}");
        AppError::Internal
    })?;

    let user = db
        .create_user(&NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password,
            role: Role::User,
            pets: Vec::new(),
        })
        .await?;

    info!(user_id = %user.id, "Registered user");

    Ok(Json(RegisterResponse {
        status: "success",
        payload: user.id,
        message: "User registered successfully",
    }))
}

/// Log in and receive a signed session cookie.
#[utoipa::path(
    post,
    path = "/api/sessions/login",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the coderCookie cookie", body = LoginResponse),
        (status = 400, description = "Incomplete values or incorrect password"),
        (status = 404, description = "User doesn't exist")
    )
)]
pub async fn login(
    Extension(db): Extension<Database>,
    Extension(keys): Extension<SessionKeys>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(SignedCookieJar, Json<LoginResponse>), AppError> {
    let req = session_body(body)?;
    let user = authenticate(&db, &req).await?;
    let token_user = TokenUser::from(&user);
    let token = create_token(&keys, &token_user)?;

    let jar = SignedCookieJar::new(keys.cookie_key.clone())
        .add(session_cookie(&keys, SESSION_COOKIE, token));

    Ok((
        jar,
        Json(LoginResponse {
            status: "success",
            message: "Logged in successfully",
            user: token_user,
        }),
    ))
}

/// Return the user in the current session.
#[utoipa::path(
    get,
    path = "/api/sessions/current",
    tag = "sessions",
    responses(
        (status = 200, description = "Current session user", body = TokenUser),
        (status = 401, description = "No authentication token, or it is invalid or expired")
    )
)]
pub async fn current(SessionUser(user): SessionUser) -> Json<PayloadResponse<TokenUser>> {
    Json(PayloadResponse::success(user))
}

/// Clear the session cookie.
#[utoipa::path(
    get,
    path = "/api/sessions/logout",
    tag = "sessions",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(
    Extension(keys): Extension<SessionKeys>,
    headers: HeaderMap,
) -> (SignedCookieJar, Json<MessageResponse>) {
    let jar = SignedCookieJar::from_headers(&headers, keys.cookie_key.clone())
        .remove(Cookie::build(SESSION_COOKIE).path("/"));

    (jar, Json(MessageResponse::success("Logged out successfully")))
}

/// Log in with an unsigned cookie holding the full profile.
#[utoipa::path(
    post,
    path = "/api/sessions/unprotectedLogin",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the unprotectedCookie cookie", body = MessageResponse),
        (status = 400, description = "Incomplete values or incorrect password"),
        (status = 404, description = "User doesn't exist")
    )
)]
pub async fn unprotected_login(
    Extension(db): Extension<Database>,
    Extension(keys): Extension<SessionKeys>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let req = session_body(body)?;
    let user = authenticate(&db, &req).await?;
    let token = create_token(&keys, UserProfile::from(&user))?;

    let jar = CookieJar::new().add(session_cookie(&keys, UNPROTECTED_COOKIE, token));

    Ok((jar, Json(MessageResponse::success("Unprotected Logged in"))))
}

/// Return the profile in the unsigned cookie.
#[utoipa::path(
    get,
    path = "/api/sessions/unprotectedCurrent",
    tag = "sessions",
    responses(
        (status = 200, description = "Profile from the unprotected cookie", body = UserProfile),
        (status = 401, description = "No authentication token, or it is invalid or expired")
    )
)]
pub async fn unprotected_current(
    UnprotectedUser(profile): UnprotectedUser,
) -> Json<PayloadResponse<UserProfile>> {
    Json(PayloadResponse::success(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::from_config(&AppConfig::default()).unwrap()
    }

    fn token_user() -> TokenUser {
        TokenUser {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("coder123").unwrap();
        assert!(verify_password("coder123", &hash).unwrap());
        assert!(!verify_password("coder124", &hash).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differ() {
        let a = hash_password("coder123").unwrap();
        let b = hash_password("coder123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        assert!(matches!(
            verify_password("coder123", "not-a-phc-string"),
            Err(AppError::Internal)
        ));
    }

    #[test]
    fn test_token_roundtrip() {
        let keys = keys();
        let token = create_token(&keys, token_user()).unwrap();
        let claims = verify_token::<TokenUser>(&keys, &token).unwrap();

        assert_eq!(claims.user, token_user());
        assert_eq!(claims.exp - claims.iat, keys.ttl.whole_seconds());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = SessionKeys::from_config(&AppConfig {
            jwt_secret: "a-completely-different-secret".to_string(),
            ..AppConfig::default()
        })
        .unwrap();
        let token = create_token(&other, token_user()).unwrap();

        assert!(matches!(
            verify_token::<TokenUser>(&keys(), &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = SessionKeys {
            ttl: Duration::hours(-2),
            ..keys()
        };
        let token = create_token(&expired, token_user()).unwrap();

        assert!(matches!(
            verify_token::<TokenUser>(&expired, &token),
            Err(AppError::Unauthorized("Invalid or expired token"))
        ));
    }

    #[test]
    fn test_cookies_secure_outside_development() {
        let dev = session_cookie(&keys(), SESSION_COOKIE, "token".to_string());
        assert_eq!(dev.secure(), Some(false));

        let prod = SessionKeys::from_config(&AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        })
        .unwrap();
        let cookie = session_cookie(&prod, SESSION_COOKIE, "token".to_string());
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            first_name: String::new(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret".to_string(),
        };
        let err = validation_message(req.validate().unwrap_err());
        assert_eq!(err.to_string(), "Invalid input: Incomplete values");
    }

    #[test]
    fn test_long_names_are_complete() {
        let req = RegisterRequest {
            first_name: "A".repeat(150),
            last_name: "B".repeat(101),
            email: "long@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
