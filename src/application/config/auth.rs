use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (12 hours).
    pub token_expire_secs: i64,
    /// Static API key identifying user-class callers (`x-api-key` header).
    pub user_api_key: String,
    /// Static API key identifying admin-class callers.
    pub admin_api_key: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var("BETCLASS_JWT_SECRET")
                .unwrap_or_else(|_| "betclass-dev-secret".to_string()),
            token_expire_secs: env::var("BETCLASS_TOKEN_EXPIRE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(43_200),
            user_api_key: env::var("BETCLASS_USER_API_KEY")
                .unwrap_or_else(|_| "betclass-user-key".to_string()),
            admin_api_key: env::var("BETCLASS_ADMIN_API_KEY")
                .unwrap_or_else(|_| "betclass-admin-key".to_string()),
        }
    }
}
