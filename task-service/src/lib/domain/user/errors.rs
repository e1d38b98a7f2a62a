use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for password operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password is required")]
    Blank,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Top-level error for registration, login and logout
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("{0}")]
    Password(#[from] PasswordError),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    // Absent user and wrong password share this variant
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    NotFoundByUsername(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
