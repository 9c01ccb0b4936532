//! Password hashing and bearer-token handling.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{AppError, Result};

/// Caller role carried in the token; admins bypass self-ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (principal id)
    pub role: Role,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String,
}

impl Claims {
    /// Parse the subject as a principal id.
    pub fn subject_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Create a 12-hour HS256 access token for the given principal.
pub fn create_access_token(subject: i64, role: Role) -> Result<String> {
    let now = Utc::now();
    let exp = now + Duration::seconds(CONFIG.auth.token_expire_secs);

    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let encoding_key = EncodingKey::from_secret(CONFIG.auth.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key).map_err(|e| e.into())
}

/// Decode and validate a bearer token
pub fn decode_token(token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_secret(CONFIG.auth.jwt_secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}
