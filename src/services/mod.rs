pub mod generator;
pub mod notify;
pub mod progress;
pub mod security;

pub use notify::record_admin_notification;
pub use security::{
    create_access_token, decode_token, hash_password, verify_password, Claims, Role,
};
