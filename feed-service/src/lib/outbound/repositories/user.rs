use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::StorageError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::outbound::database::with_deadline;
use crate::outbound::database::PgSession;
use crate::outbound::repositories::role::RoleRow;

const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password, u.is_active,
           u.created_at, u.created_by, u.updated_at, u.updated_by,
           r.id AS role_id,
           r.name AS role_name,
           r.level AS role_level,
           r.description AS role_description,
           r.is_active AS role_is_active
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    #[sqlx(flatten)]
    role: RoleRow,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)
                .map_err(|e| StorageError::Corrupted(e.to_string()))?,
            email: EmailAddress::new(row.email)
                .map_err(|e| StorageError::Corrupted(e.to_string()))?,
            password_hash: row.password,
            is_active: row.is_active,
            role: Role::try_from(row.role)?,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

#[derive(Debug, Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserRepository<PgSession> for PostgresUserRepository {
    async fn create(&self, session: &mut PgSession, user: &User) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query(
                r#"
                INSERT INTO users (id, username, email, password, is_active, role_id, created_at, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(user.id.0)
            .bind(user.username.as_str())
            .bind(user.email.as_str())
            .bind(user.password_hash.as_str())
            .bind(user.is_active)
            .bind(user.role.id.0)
            .bind(user.created_at)
            .bind(user.created_by.as_str())
            .execute(session.connection()),
        )
        .await
        .map_err(|e| {
            tracing::error!(email = %user.email, error = %e, "failed to insert user");
            e
        })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        session: &mut PgSession,
        id: &UserId,
    ) -> Result<Option<User>, StorageError> {
        let query = format!("{SELECT_USER} WHERE u.id = $1");
        let row = with_deadline(
            session.statement_timeout(),
            sqlx::query_as::<_, UserRow>(&query)
                .bind(id.0)
                .fetch_optional(session.connection()),
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(
        &self,
        session: &mut PgSession,
        email: &EmailAddress,
    ) -> Result<Option<User>, StorageError> {
        let query = format!("{SELECT_USER} WHERE u.email = $1");
        let row = with_deadline(
            session.statement_timeout(),
            sqlx::query_as::<_, UserRow>(&query)
                .bind(email.as_str())
                .fetch_optional(session.connection()),
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, session: &mut PgSession, user: &User) -> Result<bool, StorageError> {
        let result = with_deadline(
            session.statement_timeout(),
            sqlx::query(
                r#"
                UPDATE users
                SET username = $2, email = $3, is_active = $4, role_id = $5,
                    updated_at = $6, updated_by = $7
                WHERE id = $1
                "#,
            )
            .bind(user.id.0)
            .bind(user.username.as_str())
            .bind(user.email.as_str())
            .bind(user.is_active)
            .bind(user.role.id.0)
            .bind(user.updated_at)
            .bind(user.updated_by.as_deref())
            .execute(session.connection()),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
