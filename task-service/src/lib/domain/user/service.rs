use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::PasswordError;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service for registration, login and logout.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `authenticator` - Shared hasher and token codec
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self.repository.exists(&command.username).await? {
            tracing::info!(username = %command.username, "Registration rejected: username taken");
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        // The store's unique constraint settles races the pre-check missed
        let created = self
            .repository
            .create(User::new(command.username, password_hash))
            .await?;

        tracing::info!(user_id = %created.id, username = %created.username, "User registered");

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<String, UserError> {
        let Some(mut user) = self.repository.find_by_username(&command.username).await? else {
            tracing::info!(username = %command.username, "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                command.password.expose(),
                &user.password_hash,
                user.username.as_str(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                AuthenticationError::JwtError(err) => UserError::Token(err.to_string()),
            });

        let access_token = match result {
            Ok(result) => result.access_token,
            Err(e) => {
                tracing::info!(username = %command.username, "Login rejected");
                return Err(e);
            }
        };

        user.logged_in = true;
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(access_token)
    }

    async fn logout(&self, username: &Username) -> Result<(), UserError> {
        let mut user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))?;

        user.logged_in = false;
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged out");

        Ok(())
    }
}
