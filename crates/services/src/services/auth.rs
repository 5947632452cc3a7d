//! Account registration, password login and JWT issuing.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinError;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    config::AppConfig,
    users::{Conflict, User, UserProfile, UserStore},
};

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{3,32}$").unwrap();
}

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Failed to issue token: {0}")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
    #[error("Token lifetime is out of range")]
    TokenLifetime,
    #[error(transparent)]
    Join(#[from] JoinError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            users: UserStore::new(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let ttl = Duration::try_hours(config.jwt_ttl_hours).ok_or(AuthError::TokenLifetime)?;
        Ok(Self::new(&config.jwt_secret, ttl, config.bcrypt_cost))
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<UserProfile, AuthError> {
        let username = req.username.trim().to_string();
        let email = req.email.trim().to_lowercase();
        validate_registration(&username, &email, &req.password)?;

        // Fail fast before hashing
        if self.users.find_by_username(&username).await.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let cost = self.bcrypt_cost;
        let password = req.password;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
            last_login_at: None,
        };
        let profile = UserProfile::from(&user);

        self.users.insert(user).await.map_err(|conflict| match conflict {
            Conflict::Username => AuthError::UsernameTaken,
            Conflict::Email => AuthError::EmailTaken,
        })?;

        tracing::info!("[AUTH] Registered user '{}'", profile.username);
        Ok(profile)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let Some(user) = self.users.find_by_username(req.username.trim()).await else {
            tracing::debug!("[AUTH] Login for unknown user '{}'", req.username);
            return Err(AuthError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let password = req.password;
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        if !valid {
            tracing::debug!("[AUTH] Wrong password for '{}'", user.username);
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .users
            .touch_last_login(user.id)
            .await
            .ok_or(AuthError::UserNotFound)?;
        let token = self.issue_token(&user)?;

        tracing::info!("[AUTH] User '{}' logged in", user.username);
        Ok(LoginResponse {
            token,
            user: UserProfile::from(&user),
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.token_ttl)
            .ok_or(AuthError::TokenLifetime)?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::TokenIssue)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }

    /// Resolves the profile behind a set of verified claims.
    pub async fn current_user(&self, claims: &Claims) -> Result<UserProfile, AuthError> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::UserNotFound)?;
        self.users
            .find_by_id(id)
            .await
            .map(|user| UserProfile::from(&user))
            .ok_or(AuthError::UserNotFound)
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if !USERNAME_RE.is_match(username) {
        return Err(AuthError::Validation(
            "Username must be 3-32 characters of letters, digits, '_' or '-'".to_string(),
        ));
    }
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(AuthError::Validation("Email address is not valid".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
