pub mod auth;
pub mod permissions;

pub use auth::require_api_key;
pub use auth::require_auth;
pub use auth::Principal;
pub use permissions::{ensure_admin, ensure_self_or_admin};
