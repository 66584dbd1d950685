use async_trait::async_trait;

use crate::domain::errors::StorageError;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostFilter;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostPage;
use crate::domain::post::models::Tag;
use crate::domain::post::models::TagId;
use crate::domain::post::models::TagName;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::UserId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Create a post authored by `author` and link its tags.
    ///
    /// Unseen tag names are created; existing tags are reused.
    ///
    /// # Errors
    /// * `AuthorNotFound` - Author does not exist
    /// * `Storage` - Database operation failed
    async fn create_post(
        &self,
        author: &AuthenticatedUser,
        command: CreatePostCommand,
    ) -> Result<Post, PostError>;

    /// List posts matching `filter`, with the total match count.
    ///
    /// # Errors
    /// * `Storage` - Database operation failed
    async fn list_posts(&self, filter: &PostFilter) -> Result<PostPage, PostError>;

    /// Retrieve a post with its author, the author's role and its tags.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Storage` - Database operation failed
    async fn get_post(&self, id: &PostId) -> Result<Post, PostError>;

    /// Overwrite title, content and publication state. Slug and tags are kept.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Forbidden` - Editor is neither the author nor a moderator
    /// * `Storage` - Database operation failed
    async fn update_post(
        &self,
        editor: &AuthenticatedUser,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError>;

    /// Delete a post with its tag and author links.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Forbidden` - Actor is neither the author nor a moderator
    /// * `Storage` - Database operation failed
    async fn delete_post(&self, actor: &AuthenticatedUser, id: &PostId) -> Result<(), PostError>;
}

/// Persistence operations for posts and their link rows.
#[async_trait]
pub trait PostRepository<S: Send>: Send + Sync + 'static {
    /// Insert the post row. Tags and the author link are written separately.
    async fn create(&self, session: &mut S, post: &Post) -> Result<(), StorageError>;

    /// Retrieve a post joined with its author and the author's role, without tags.
    async fn find_by_id(&self, session: &mut S, id: &PostId) -> Result<Option<Post>, StorageError>;

    /// Retrieve one page of matching posts joined with their authors, without
    /// tags, and the total number of matches.
    async fn find_page(
        &self,
        session: &mut S,
        filter: &PostFilter,
    ) -> Result<(Vec<Post>, i64), StorageError>;

    /// Overwrite title, content, publication and update audit fields.
    ///
    /// # Returns
    /// Whether a row was updated
    async fn update(&self, session: &mut S, post: &Post) -> Result<bool, StorageError>;

    /// Delete the post row.
    ///
    /// # Returns
    /// Whether a row was deleted
    async fn delete(&self, session: &mut S, id: &PostId) -> Result<bool, StorageError>;

    /// Author of a post, if the post exists.
    async fn find_author_id(&self, session: &mut S, id: &PostId)
        -> Result<Option<UserId>, StorageError>;

    async fn link_tag(&self, session: &mut S, post_id: &PostId, tag_id: &TagId)
        -> Result<(), StorageError>;

    /// Delete every tag link of a post. No links is not an error.
    async fn unlink_tags(&self, session: &mut S, post_id: &PostId) -> Result<(), StorageError>;

    async fn link_author(&self, session: &mut S, post_id: &PostId, user_id: &UserId)
        -> Result<(), StorageError>;

    /// Delete the author link of a post. No link is not an error.
    async fn unlink_author(&self, session: &mut S, post_id: &PostId) -> Result<(), StorageError>;
}

/// Persistence operations for tags.
#[async_trait]
pub trait TagRepository<S: Send>: Send + Sync + 'static {
    /// # Errors
    /// * `UniqueViolation` - A tag with the same name exists
    async fn create(&self, session: &mut S, tag: &Tag) -> Result<(), StorageError>;

    async fn find_by_name(&self, session: &mut S, name: &TagName)
        -> Result<Option<Tag>, StorageError>;

    /// Tags of each listed post, ordered by name.
    async fn find_by_post_ids(
        &self,
        session: &mut S,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, Tag)>, StorageError>;
}
