use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::StorageError;
use crate::domain::user::models::Role;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::RoleName;
use crate::domain::user::ports::RoleRepository;
use crate::outbound::database::with_deadline;
use crate::outbound::database::PgSession;

/// Role columns as selected by joins, prefixed with `role_`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RoleRow {
    pub role_id: Uuid,
    pub role_name: String,
    pub role_level: i32,
    pub role_description: String,
    pub role_is_active: bool,
}

impl TryFrom<RoleRow> for Role {
    type Error = StorageError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let name = row
            .role_name
            .parse::<RoleName>()
            .map_err(|e| StorageError::Corrupted(e.to_string()))?;

        Ok(Role {
            id: RoleId(row.role_id),
            name,
            level: row.role_level,
            description: row.role_description,
            is_active: row.role_is_active,
        })
    }
}

#[derive(Debug, Default)]
pub struct PostgresRoleRepository;

impl PostgresRoleRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoleRepository<PgSession> for PostgresRoleRepository {
    async fn find_by_name(
        &self,
        session: &mut PgSession,
        name: RoleName,
    ) -> Result<Option<Role>, StorageError> {
        let row = with_deadline(
            session.statement_timeout(),
            sqlx::query_as::<_, RoleRow>(
                r#"
                SELECT id AS role_id,
                       name AS role_name,
                       level AS role_level,
                       description AS role_description,
                       is_active AS role_is_active
                FROM roles
                WHERE name = $1
                "#,
            )
            .bind(name.as_str())
            .fetch_optional(session.connection()),
        )
        .await?;

        row.map(Role::try_from).transpose()
    }
}
