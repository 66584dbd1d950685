use std::collections::BTreeSet;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::post::errors::PostContentError;
use crate::domain::post::errors::PostIdError;
use crate::domain::post::errors::PostTitleError;
use crate::domain::post::errors::TagNameError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Post aggregate.
///
/// The slug is derived from the title once, at creation, and never changes.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub slug: String,
    pub content: PostContent,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Author,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

/// Post unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a post ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PostIdError> {
        Uuid::parse_str(s)
            .map(PostId)
            .map_err(|e| PostIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post title value object.
///
/// Surrounding whitespace is trimmed; the rest must be 1-255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    const MAX_LENGTH: usize = 255;

    /// # Errors
    /// * `Empty` - Title is blank
    /// * `TooLong` - Title exceeds 255 characters
    pub fn new(title: String) -> Result<Self, PostTitleError> {
        let title = title.trim();
        let length = title.chars().count();
        if length == 0 {
            Err(PostTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(PostTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post body. Any non-blank text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    pub fn new(content: String) -> Result<Self, PostContentError> {
        if content.trim().is_empty() {
            Err(PostContentError::Empty)
        } else {
            Ok(Self(content))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(pub Uuid);

impl TagId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag name value object.
///
/// Trimmed, 1-64 characters. Names are compared exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    const MAX_LENGTH: usize = 64;

    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name exceeds 64 characters
    pub fn new(name: String) -> Result<Self, TagNameError> {
        let name = name.trim();
        let length = name.chars().count();
        if length == 0 {
            Err(TagNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TagNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
}

/// Snapshot of a post's author.
///
/// The role is only loaded when a single post is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: Option<Role>,
}

impl From<User> for Author {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: Some(user.role),
        }
    }
}

/// Sort direction on creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc` in any case selects ascending order; anything else is descending.
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Criteria for listing posts.
///
/// A post matches when it satisfies every present criterion. `tags` requires
/// the post to carry all of the listed names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub tags: BTreeSet<TagName>,
    pub sort: SortDirection,
    pub limit: i64,
    pub offset: i64,
}

impl PostFilter {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamp pagination into range: limit to 1..=100, offset to >= 0.
    pub fn with_page(mut self, limit: Option<i64>, offset: Option<i64>) -> Self {
        self.limit = limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        self.offset = offset.unwrap_or(0).max(0);
        self
    }
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            search: None,
            date_from: None,
            date_to: None,
            tags: BTreeSet::new(),
            sort: SortDirection::default(),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of posts plus the number of posts matching the filter.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: i64,
}

/// Command to create a post with validated fields
#[derive(Debug)]
pub struct CreatePostCommand {
    pub title: PostTitle,
    pub content: PostContent,
    pub tags: Vec<TagName>,
    pub publish: bool,
}

/// Command to overwrite the editable fields of a post
#[derive(Debug)]
pub struct UpdatePostCommand {
    pub title: PostTitle,
    pub content: PostContent,
    pub publish: bool,
}
