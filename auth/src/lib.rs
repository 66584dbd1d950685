//! Authentication utilities library
//!
//! Provides the authentication primitives of the feed service:
//! - Secret hashing for passwords and confirmation tokens (Argon2id)
//! - JWT issuance and bearer-header validation (HMAC)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Secret Hashing
//! ```
//! use auth::SecretHasher;
//!
//! let hasher = SecretHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password"));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//! let claims = Claims::new("user123", "user", now, now + Duration::hours(1));
//! let token = handler.issue(&claims).unwrap();
//! let decoded = handler.validate_header(&format!("Bearer {}", token)).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod authenticator;
pub mod hashing;
pub mod jwt;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::TokenSettings;
pub use hashing::HashingError;
pub use hashing::SecretHasher;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
