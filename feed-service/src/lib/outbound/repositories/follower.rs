use async_trait::async_trait;

use crate::domain::errors::StorageError;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::FollowerRepository;
use crate::outbound::database::with_deadline;
use crate::outbound::database::PgSession;

#[derive(Debug, Default)]
pub struct PostgresFollowerRepository;

impl PostgresFollowerRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FollowerRepository<PgSession> for PostgresFollowerRepository {
    async fn create(
        &self,
        session: &mut PgSession,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("INSERT INTO followers (follower_id, followee_id) VALUES ($1, $2)")
                .bind(follower.0)
                .bind(followee.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }

    async fn delete(
        &self,
        session: &mut PgSession,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("DELETE FROM followers WHERE follower_id = $1 AND followee_id = $2")
                .bind(follower.0)
                .bind(followee.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }
}
