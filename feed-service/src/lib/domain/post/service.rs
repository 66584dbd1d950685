use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::errors::StorageError;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::Author;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostFilter;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostPage;
use crate::domain::post::models::Tag;
use crate::domain::post::models::TagId;
use crate::domain::post::models::TagName;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::post::ports::TagRepository;
use crate::domain::post::slug::slugify;
use crate::domain::transaction::run_in_transaction;
use crate::domain::transaction::UnitOfWork;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::ports::UserRepository;

/// Domain service for authoring and querying posts.
pub struct PostService<U, UR, PR, TR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    PR: PostRepository<U::Session>,
    TR: TagRepository<U::Session>,
{
    unit_of_work: Arc<U>,
    user_repository: Arc<UR>,
    post_repository: Arc<PR>,
    tag_repository: Arc<TR>,
}

impl<U, UR, PR, TR> PostService<U, UR, PR, TR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    PR: PostRepository<U::Session>,
    TR: TagRepository<U::Session>,
{
    pub fn new(
        unit_of_work: Arc<U>,
        user_repository: Arc<UR>,
        post_repository: Arc<PR>,
        tag_repository: Arc<TR>,
    ) -> Self {
        Self {
            unit_of_work,
            user_repository,
            post_repository,
            tag_repository,
        }
    }
}

/// Fill in the tags of each post from one lookup.
async fn attach_tags<S, TR>(
    tag_repository: &TR,
    session: &mut S,
    posts: &mut [Post],
) -> Result<(), StorageError>
where
    S: Send,
    TR: TagRepository<S>,
{
    if posts.is_empty() {
        return Ok(());
    }

    let ids: Vec<PostId> = posts.iter().map(|post| post.id).collect();
    let mut by_post: HashMap<PostId, Vec<Tag>> = HashMap::new();
    for (post_id, tag) in tag_repository.find_by_post_ids(session, &ids).await? {
        by_post.entry(post_id).or_default().push(tag);
    }

    for post in posts.iter_mut() {
        post.tags = by_post.remove(&post.id).unwrap_or_default();
    }
    Ok(())
}

/// Drop repeated names, keeping first occurrences in order.
fn distinct_tag_names(names: Vec<TagName>) -> Vec<TagName> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[async_trait]
impl<U, UR, PR, TR> PostServicePort for PostService<U, UR, PR, TR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Session>,
    PR: PostRepository<U::Session>,
    TR: TagRepository<U::Session>,
{
    async fn create_post(
        &self,
        author: &AuthenticatedUser,
        command: CreatePostCommand,
    ) -> Result<Post, PostError> {
        let author = {
            let mut session = self.unit_of_work.session().await?;
            self.user_repository
                .find_by_id(&mut session, &author.user_id)
                .await?
                .ok_or(PostError::AuthorNotFound(author.user_id.to_string()))?
        };

        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            slug: slugify(command.title.as_str()),
            title: command.title,
            content: command.content,
            is_published: command.publish,
            published_at: command.publish.then_some(now),
            created_by: author.email.to_string(),
            author: Author::from(author),
            tags: Vec::new(),
            created_at: now,
            updated_at: None,
            updated_by: None,
        };
        let tag_names = distinct_tag_names(command.tags);

        let posts = Arc::clone(&self.post_repository);
        let tags = Arc::clone(&self.tag_repository);

        let post = run_in_transaction(&*self.unit_of_work, move |session| {
            Box::pin(async move {
                let mut post = post;
                posts.create(session, &post).await?;

                for name in tag_names {
                    let tag = match tags.find_by_name(session, &name).await? {
                        Some(existing) => existing,
                        None => {
                            let created = Tag {
                                id: TagId::new(),
                                name,
                            };
                            tags.create(session, &created).await?;
                            created
                        }
                    };
                    posts.link_tag(session, &post.id, &tag.id).await?;
                    post.tags.push(tag);
                }

                posts.link_author(session, &post.id, &post.author.id).await?;
                Ok(post)
            })
        })
        .await
        .map_err(|e: PostError| {
            tracing::error!(error = %e, "failed to save post");
            e
        })?;

        tracing::info!(post_id = %post.id, author_id = %post.author.id, "post created");
        Ok(post)
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<PostPage, PostError> {
        let mut session = self.unit_of_work.session().await?;

        let (mut posts, total) = self
            .post_repository
            .find_page(&mut session, filter)
            .await?;
        attach_tags(&*self.tag_repository, &mut session, &mut posts).await?;

        Ok(PostPage { posts, total })
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, PostError> {
        let mut session = self.unit_of_work.session().await?;

        let post = self
            .post_repository
            .find_by_id(&mut session, id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        let mut posts = [post];
        attach_tags(&*self.tag_repository, &mut session, &mut posts).await?;
        let [post] = posts;
        Ok(post)
    }

    async fn update_post(
        &self,
        editor: &AuthenticatedUser,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError> {
        let posts = Arc::clone(&self.post_repository);
        let tags = Arc::clone(&self.tag_repository);
        let editor = editor.clone();
        let id = *id;

        run_in_transaction(&*self.unit_of_work, move |session| {
            Box::pin(async move {
                let mut post = posts
                    .find_by_id(session, &id)
                    .await?
                    .ok_or(PostError::NotFound(id.to_string()))?;

                if !editor.can_manage(&post.author.id) {
                    tracing::warn!(post_id = %id, editor = %editor.username, "post update forbidden");
                    return Err(PostError::Forbidden(id.to_string()));
                }

                let now = Utc::now();
                post.title = command.title;
                post.content = command.content;
                post.published_at = match (post.is_published, command.publish) {
                    (false, true) => Some(now),
                    (_, false) => None,
                    (true, true) => post.published_at,
                };
                post.is_published = command.publish;
                post.updated_at = Some(now);
                post.updated_by = Some(editor.username.clone());

                if !posts.update(session, &post).await? {
                    return Err(PostError::NotFound(id.to_string()));
                }

                attach_tags(&*tags, session, std::slice::from_mut(&mut post)).await?;
                Ok(post)
            })
        })
        .await
    }

    async fn delete_post(&self, actor: &AuthenticatedUser, id: &PostId) -> Result<(), PostError> {
        let posts = Arc::clone(&self.post_repository);
        let actor = actor.clone();
        let id = *id;

        run_in_transaction(&*self.unit_of_work, move |session| {
            Box::pin(async move {
                if let Some(owner) = posts.find_author_id(session, &id).await? {
                    if !actor.can_manage(&owner) {
                        tracing::warn!(post_id = %id, actor = %actor.username, "post deletion forbidden");
                        return Err(PostError::Forbidden(id.to_string()));
                    }
                }

                posts.unlink_tags(session, &id).await?;
                posts.unlink_author(session, &id).await?;
                if !posts.delete(session, &id).await? {
                    return Err(PostError::NotFound(id.to_string()));
                }

                tracing::info!(post_id = %id, actor = %actor.username, "post deleted");
                Ok(())
            })
        })
        .await
    }
}
