use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use crate::ledger::{CreateUserOutcome, LedgerStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login and password are required")]
    MissingCredentials,
    #[error("Login already taken")]
    LoginTaken,
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid token subject: {0}")]
    InvalidSubject(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

/// Register / login request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    #[schema(example = "gopher")]
    pub login: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Issued access token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub login: String,
}

pub struct UserAuthService {
    store: Arc<dyn LedgerStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl UserAuthService {
    pub fn new(store: Arc<dyn LedgerStore>, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Register a new user and log them in
    ///
    /// The user row and its zero balance are created together.
    pub async fn register(&self, req: &Credentials) -> Result<AuthResponse, AuthError> {
        check_present(req)?;

        // 1. Hash password
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        // 2. Insert user + balance
        match self.store.create_user(&req.login, &password_hash).await? {
            CreateUserOutcome::Created { user_id } => {
                tracing::info!(user_id, login = %req.login, "User registered");
                self.issue(user_id, &req.login)
            }
            CreateUserOutcome::LoginTaken => Err(AuthError::LoginTaken),
        }
    }

    /// Verify the password and issue a token
    pub async fn login(&self, req: &Credentials) -> Result<AuthResponse, AuthError> {
        check_present(req)?;

        let user = self
            .store
            .find_user_by_login(&req.login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.issue(user.user_id, &user.login)
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    fn issue(&self, user_id: i64, login: &str) -> Result<AuthResponse, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(AuthResponse {
            token,
            user_id,
            login: login.to_string(),
        })
    }
}

fn check_present(req: &Credentials) -> Result<(), AuthError> {
    if req.login.trim().is_empty() || req.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}
