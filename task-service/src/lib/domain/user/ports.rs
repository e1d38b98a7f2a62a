use async_trait::async_trait;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for registration, login and logout.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new principal.
    ///
    /// # Arguments
    /// * `command` - Validated username and plaintext password
    ///
    /// # Returns
    /// Stored principal, not logged in
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is taken (pre-check or store constraint)
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Returns
    /// Signed token whose subject is the username
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `Token` - Token could not be signed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<String, UserError>;

    /// Clear the login-state flag.
    ///
    /// Outstanding tokens remain valid until they expire.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No principal with this username
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, username: &Username) -> Result<(), UserError>;
}

/// Credential store for principals.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new principal.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Store uniqueness constraint rejected the row
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve principal by username.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Whether a principal with this username exists.
    async fn exists(&self, username: &Username) -> Result<bool, UserError>;

    /// Persist field mutations of an existing principal.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - Principal does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}
