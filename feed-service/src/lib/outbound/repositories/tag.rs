use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::StorageError;
use crate::domain::post::models::PostId;
use crate::domain::post::models::Tag;
use crate::domain::post::models::TagId;
use crate::domain::post::models::TagName;
use crate::domain::post::ports::TagRepository;
use crate::outbound::database::with_deadline;
use crate::outbound::database::PgSession;

#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
}

impl TryFrom<TagRow> for Tag {
    type Error = StorageError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: TagId(row.id),
            name: TagName::new(row.name).map_err(|e| StorageError::Corrupted(e.to_string()))?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostTagRow {
    post_id: Uuid,
    #[sqlx(flatten)]
    tag: TagRow,
}

#[derive(Debug, Default)]
pub struct PostgresTagRepository;

impl PostgresTagRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TagRepository<PgSession> for PostgresTagRepository {
    async fn create(&self, session: &mut PgSession, tag: &Tag) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("INSERT INTO tags (id, name) VALUES ($1, $2)")
                .bind(tag.id.0)
                .bind(tag.name.as_str())
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }

    async fn find_by_name(
        &self,
        session: &mut PgSession,
        name: &TagName,
    ) -> Result<Option<Tag>, StorageError> {
        let row = with_deadline(
            session.statement_timeout(),
            sqlx::query_as::<_, TagRow>("SELECT id, name FROM tags WHERE name = $1")
                .bind(name.as_str())
                .fetch_optional(session.connection()),
        )
        .await?;

        row.map(Tag::try_from).transpose()
    }

    async fn find_by_post_ids(
        &self,
        session: &mut PgSession,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, Tag)>, StorageError> {
        let ids: Vec<Uuid> = post_ids.iter().map(|id| id.0).collect();

        let rows = with_deadline(
            session.statement_timeout(),
            sqlx::query_as::<_, PostTagRow>(
                r#"
                SELECT pt.post_id, t.id, t.name
                FROM post_tag pt
                JOIN tags t ON t.id = pt.tag_id
                WHERE pt.post_id = ANY($1)
                ORDER BY t.name
                "#,
            )
            .bind(ids)
            .fetch_all(session.connection()),
        )
        .await?;

        rows.into_iter()
            .map(|row| {
                let post_id = PostId(row.post_id);
                Tag::try_from(row.tag).map(|tag| (post_id, tag))
            })
            .collect()
    }
}
