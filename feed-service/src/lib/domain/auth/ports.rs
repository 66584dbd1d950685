use async_trait::async_trait;

use crate::domain::auth::email::EmailDeliveryError;
use crate::domain::auth::email::EmailTemplate;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Token;
use crate::domain::errors::StorageError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;

/// Port for registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register an inactive account and email it a confirmation link.
    ///
    /// Persisting the user, persisting its confirmation token and sending the
    /// email happen in one transaction.
    ///
    /// # Returns
    /// Created user with its role
    ///
    /// # Errors
    /// * `AlreadyExists` - Email or username already registered
    /// * `DefaultRoleMissing` - The `user` role is not seeded
    /// * `EmailDelivery` - Confirmation email could not be sent
    /// * `Storage` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials and issue a signed access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Unknown email, wrong password or failed lookup
    /// * `TokenIssuance` - Token signing failed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, AuthError>;
}

/// Persistence of single-use tokens.
#[async_trait]
pub trait TokenRepository<S: Send>: Send + Sync + 'static {
    async fn create(&self, session: &mut S, token: &Token) -> Result<(), StorageError>;
}

/// Outbound email delivery.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    async fn send(
        &self,
        template: &EmailTemplate,
        recipient: &EmailAddress,
    ) -> Result<(), EmailDeliveryError>;
}
