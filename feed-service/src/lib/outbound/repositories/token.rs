use async_trait::async_trait;

use crate::domain::auth::models::Token;
use crate::domain::auth::ports::TokenRepository;
use crate::domain::errors::StorageError;
use crate::outbound::database::with_deadline;
use crate::outbound::database::PgSession;

#[derive(Debug, Default)]
pub struct PostgresTokenRepository;

impl PostgresTokenRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenRepository<PgSession> for PostgresTokenRepository {
    async fn create(&self, session: &mut PgSession, token: &Token) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query(
                r#"
                INSERT INTO tokens (id, type, value, expired_at, user_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(token.id.0)
            .bind(token.token_type.as_str())
            .bind(token.value_hash.as_str())
            .bind(token.expires_at)
            .bind(token.user_id.0)
            .execute(session.connection()),
        )
        .await?;

        Ok(())
    }
}
