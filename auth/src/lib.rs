//! Authentication primitives for the task service
//!
//! - Password hashing (Argon2id, salted per call)
//! - Bearer token issuance and validation (HS256 compact tokens)
//! - Authentication coordination
//!
//! The service defines its own ports and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{JwtHandler, TokenConfig};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(1),
//! ));
//! let token = handler.issue("alice").unwrap();
//! assert!(handler.is_valid_for(&token, "alice"));
//! assert!(!handler.is_valid_for(&token, "bob"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenConfig};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(1),
//! ));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "alice").unwrap();
//!
//! // Validate token
//! assert!(auth.is_token_valid_for(&result.access_token, "alice"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenConfig;
pub use password::PasswordError;
pub use password::PasswordHasher;
