use async_trait::async_trait;

use crate::domain::errors::StorageError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::RoleName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for user and follow operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Mark a user inactive, audited by the acting principal.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Forbidden` - Actor is not a moderator or admin
    /// * `Storage` - Database operation failed
    async fn deactivate_user(
        &self,
        actor: &AuthenticatedUser,
        id: &UserId,
    ) -> Result<User, UserError>;

    /// Add a follow edge from `follower` to `followee`.
    ///
    /// # Errors
    /// * `SelfFollow` - Follower and followee are the same user
    /// * `NotFound` - Followee does not exist
    /// * `Storage` - Database operation failed, including a duplicate edge
    async fn follow(&self, follower: &AuthenticatedUser, followee: &UserId)
        -> Result<(), UserError>;

    /// Remove a follow edge. Absence of the edge is not an error.
    ///
    /// # Errors
    /// * `NotFound` - Followee does not exist
    /// * `Storage` - Database operation failed
    async fn unfollow(
        &self,
        follower: &AuthenticatedUser,
        followee: &UserId,
    ) -> Result<(), UserError>;
}

/// Persistence operations for users.
///
/// Every call runs on the session it is handed, so the same repository serves
/// plain reads and transactional writes.
#[async_trait]
pub trait UserRepository<S: Send>: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `UniqueViolation` - Email or username already taken
    async fn create(&self, session: &mut S, user: &User) -> Result<(), StorageError>;

    /// Retrieve a user with its role.
    async fn find_by_id(&self, session: &mut S, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Retrieve a user with its role by email address.
    async fn find_by_email(
        &self,
        session: &mut S,
        email: &EmailAddress,
    ) -> Result<Option<User>, StorageError>;

    /// Overwrite the mutable fields of a user.
    ///
    /// # Returns
    /// Whether a row was updated
    async fn update(&self, session: &mut S, user: &User) -> Result<bool, StorageError>;
}

/// Lookup of role reference data.
#[async_trait]
pub trait RoleRepository<S: Send>: Send + Sync + 'static {
    async fn find_by_name(&self, session: &mut S, name: RoleName)
        -> Result<Option<Role>, StorageError>;
}

/// Persistence of directed follow edges.
#[async_trait]
pub trait FollowerRepository<S: Send>: Send + Sync + 'static {
    /// Insert an edge.
    ///
    /// # Errors
    /// * `UniqueViolation` - The edge already exists
    async fn create(
        &self,
        session: &mut S,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<(), StorageError>;

    /// Delete an edge if present.
    async fn delete(
        &self,
        session: &mut S,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<(), StorageError>;
}
