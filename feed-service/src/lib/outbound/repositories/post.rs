use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::domain::errors::StorageError;
use crate::domain::post::models::Author;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostFilter;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostTitle;
use crate::domain::post::models::TagId;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::outbound::database::with_deadline;
use crate::outbound::database::PgSession;
use crate::outbound::repositories::role::RoleRow;

const SELECT_POST: &str = "SELECT p.id, p.title, p.slug, p.content, p.is_published, p.published_at, \
     p.created_at, p.created_by, p.updated_at, p.updated_by, \
     u.id AS author_id, u.username AS author_username, u.email AS author_email \
     FROM posts p JOIN users u ON u.id = p.author_id";

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    slug: String,
    content: String,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    author_id: Uuid,
    author_username: String,
    author_email: String,
}

#[derive(Debug, sqlx::FromRow)]
struct PostWithRoleRow {
    #[sqlx(flatten)]
    post: PostRow,
    #[sqlx(flatten)]
    role: RoleRow,
}

impl PostRow {
    fn into_post(self, role: Option<Role>) -> Result<Post, StorageError> {
        let corrupted = |e: &dyn std::fmt::Display| StorageError::Corrupted(e.to_string());

        Ok(Post {
            id: PostId(self.id),
            title: PostTitle::new(self.title).map_err(|e| corrupted(&e))?,
            slug: self.slug,
            content: PostContent::new(self.content).map_err(|e| corrupted(&e))?,
            is_published: self.is_published,
            published_at: self.published_at,
            author: Author {
                id: UserId(self.author_id),
                username: Username::new(self.author_username).map_err(|e| corrupted(&e))?,
                email: EmailAddress::new(self.author_email).map_err(|e| corrupted(&e))?,
                role,
            },
            tags: Vec::new(),
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        })
    }
}

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Substring pattern for ILIKE. The term is matched as given.
fn search_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Append the WHERE clause for `filter`. Shared by the page and count queries.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    builder.push(" WHERE TRUE");

    if let Some(search) = filter.search.as_deref().filter(|term| !term.is_empty()) {
        let pattern = search_pattern(search);
        builder
            .push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(from) = filter.date_from {
        builder.push(" AND p.created_at >= ").push_bind(from);
    }

    if let Some(to) = filter.date_to {
        builder.push(" AND p.created_at <= ").push_bind(to);
    }

    if !filter.tags.is_empty() {
        let names: Vec<String> = filter.tags.iter().map(|tag| tag.to_string()).collect();
        let required = names.len() as i64;
        builder
            .push(
                " AND p.id IN (SELECT pt.post_id FROM post_tag pt \
                 JOIN tags t ON t.id = pt.tag_id WHERE t.name = ANY(",
            )
            .push_bind(names)
            .push(") GROUP BY pt.post_id HAVING COUNT(DISTINCT t.name) = ")
            .push_bind(required)
            .push(")");
    }
}

fn page_query(filter: &PostFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_POST);
    push_filter(&mut builder, filter);

    let direction = filter.sort.as_sql();
    builder
        .push(" ORDER BY p.created_at ")
        .push(direction)
        .push(", p.id ")
        .push(direction)
        .push(" LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);
    builder
}

fn count_query(filter: &PostFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
    push_filter(&mut builder, filter);
    builder
}

#[derive(Debug, Default)]
pub struct PostgresPostRepository;

impl PostgresPostRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PostRepository<PgSession> for PostgresPostRepository {
    async fn create(&self, session: &mut PgSession, post: &Post) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query(
                r#"
                INSERT INTO posts (id, title, slug, content, is_published, published_at,
                                   author_id, created_at, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(post.id.0)
            .bind(post.title.as_str())
            .bind(post.slug.as_str())
            .bind(post.content.as_str())
            .bind(post.is_published)
            .bind(post.published_at)
            .bind(post.author.id.0)
            .bind(post.created_at)
            .bind(post.created_by.as_str())
            .execute(session.connection()),
        )
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        session: &mut PgSession,
        id: &PostId,
    ) -> Result<Option<Post>, StorageError> {
        let row = with_deadline(
            session.statement_timeout(),
            sqlx::query_as::<_, PostWithRoleRow>(
                r#"
                SELECT p.id, p.title, p.slug, p.content, p.is_published, p.published_at,
                       p.created_at, p.created_by, p.updated_at, p.updated_by,
                       u.id AS author_id, u.username AS author_username, u.email AS author_email,
                       r.id AS role_id,
                       r.name AS role_name,
                       r.level AS role_level,
                       r.description AS role_description,
                       r.is_active AS role_is_active
                FROM posts p
                JOIN users u ON u.id = p.author_id
                JOIN roles r ON r.id = u.role_id
                WHERE p.id = $1
                "#,
            )
            .bind(id.0)
            .fetch_optional(session.connection()),
        )
        .await?;

        match row {
            Some(row) => {
                let role = Role::try_from(row.role)?;
                row.post.into_post(Some(role)).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn find_page(
        &self,
        session: &mut PgSession,
        filter: &PostFilter,
    ) -> Result<(Vec<Post>, i64), StorageError> {
        let mut count = count_query(filter);
        let total = with_deadline(
            session.statement_timeout(),
            count.build_query_scalar::<i64>().fetch_one(session.connection()),
        )
        .await?;

        let mut page = page_query(filter);
        let rows = with_deadline(
            session.statement_timeout(),
            page.build_query_as::<PostRow>().fetch_all(session.connection()),
        )
        .await?;

        let posts = rows
            .into_iter()
            .map(|row| row.into_post(None))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((posts, total))
    }

    async fn update(&self, session: &mut PgSession, post: &Post) -> Result<bool, StorageError> {
        let result = with_deadline(
            session.statement_timeout(),
            sqlx::query(
                r#"
                UPDATE posts
                SET title = $2, content = $3, is_published = $4, published_at = $5,
                    updated_at = $6, updated_by = $7
                WHERE id = $1
                "#,
            )
            .bind(post.id.0)
            .bind(post.title.as_str())
            .bind(post.content.as_str())
            .bind(post.is_published)
            .bind(post.published_at)
            .bind(post.updated_at)
            .bind(post.updated_by.as_deref())
            .execute(session.connection()),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, session: &mut PgSession, id: &PostId) -> Result<bool, StorageError> {
        let result = with_deadline(
            session.statement_timeout(),
            sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(id.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_author_id(
        &self,
        session: &mut PgSession,
        id: &PostId,
    ) -> Result<Option<UserId>, StorageError> {
        let author_id = with_deadline(
            session.statement_timeout(),
            sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM posts WHERE id = $1")
                .bind(id.0)
                .fetch_optional(session.connection()),
        )
        .await?;

        Ok(author_id.map(UserId))
    }

    async fn link_tag(
        &self,
        session: &mut PgSession,
        post_id: &PostId,
        tag_id: &TagId,
    ) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("INSERT INTO post_tag (post_id, tag_id) VALUES ($1, $2)")
                .bind(post_id.0)
                .bind(tag_id.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }

    async fn unlink_tags(&self, session: &mut PgSession, post_id: &PostId) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("DELETE FROM post_tag WHERE post_id = $1")
                .bind(post_id.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }

    async fn link_author(
        &self,
        session: &mut PgSession,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("INSERT INTO post_user (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id.0)
                .bind(user_id.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }

    async fn unlink_author(
        &self,
        session: &mut PgSession,
        post_id: &PostId,
    ) -> Result<(), StorageError> {
        with_deadline(
            session.statement_timeout(),
            sqlx::query("DELETE FROM post_user WHERE post_id = $1")
                .bind(post_id.0)
                .execute(session.connection()),
        )
        .await?;

        Ok(())
    }
}
