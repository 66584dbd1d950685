use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::transaction::run_in_transaction;
use crate::domain::transaction::UnitOfWork;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::FollowerRepository;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service for user lookups, deactivation and follow edges.
pub struct UserService<U, UR, FR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    FR: FollowerRepository<U::Session>,
{
    unit_of_work: Arc<U>,
    user_repository: Arc<UR>,
    follower_repository: Arc<FR>,
}

impl<U, UR, FR> UserService<U, UR, FR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    FR: FollowerRepository<U::Session>,
{
    pub fn new(unit_of_work: Arc<U>, user_repository: Arc<UR>, follower_repository: Arc<FR>) -> Self {
        Self {
            unit_of_work,
            user_repository,
            follower_repository,
        }
    }

    async fn ensure_exists(&self, session: &mut U::Session, id: &UserId) -> Result<(), UserError> {
        match self.user_repository.find_by_id(session, id).await? {
            Some(_) => Ok(()),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}

#[async_trait]
impl<U, UR, FR> UserServicePort for UserService<U, UR, FR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    FR: FollowerRepository<U::Session>,
{
    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        let mut session = self.unit_of_work.session().await?;
        self.user_repository
            .find_by_id(&mut session, id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn deactivate_user(
        &self,
        actor: &AuthenticatedUser,
        id: &UserId,
    ) -> Result<User, UserError> {
        if !actor.role.can_moderate() {
            return Err(UserError::Forbidden(id.to_string()));
        }

        let users = Arc::clone(&self.user_repository);
        let id = *id;
        let updated_by = actor.username.clone();

        let user = run_in_transaction(&*self.unit_of_work, move |session| {
            Box::pin(async move {
                let mut user = users
                    .find_by_id(session, &id)
                    .await?
                    .ok_or(UserError::NotFound(id.to_string()))?;

                user.is_active = false;
                user.updated_at = Some(Utc::now());
                user.updated_by = Some(updated_by);

                if !users.update(session, &user).await? {
                    return Err(UserError::NotFound(id.to_string()));
                }
                Ok(user)
            })
        })
        .await?;

        tracing::info!(user_id = %user.id, actor = %actor.username, "user deactivated");
        Ok(user)
    }

    async fn follow(
        &self,
        follower: &AuthenticatedUser,
        followee: &UserId,
    ) -> Result<(), UserError> {
        if follower.user_id == *followee {
            return Err(UserError::SelfFollow);
        }

        let mut session = self.unit_of_work.session().await?;
        self.ensure_exists(&mut session, followee).await?;

        self.follower_repository
            .create(&mut session, &follower.user_id, followee)
            .await
            .map_err(|e| {
                tracing::warn!(follower = %follower.user_id, followee = %followee, error = %e, "failed to follow user");
                UserError::from(e)
            })
    }

    async fn unfollow(
        &self,
        follower: &AuthenticatedUser,
        followee: &UserId,
    ) -> Result<(), UserError> {
        let mut session = self.unit_of_work.session().await?;
        self.ensure_exists(&mut session, followee).await?;

        self.follower_repository
            .delete(&mut session, &follower.user_id, followee)
            .await?;
        Ok(())
    }
}
