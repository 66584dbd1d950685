use std::collections::BTreeSet;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::errors::TagNameError;
use crate::domain::post::models::PostFilter;
use crate::domain::post::models::SortDirection;
use crate::domain::post::models::TagName;
use crate::inbound::http::router::AppState;

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<ApiSuccess<ListPostsResponseData>, ApiError> {
    let filter = query.try_into_filter()?;

    let page = state.post_service.list_posts(&filter).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListPostsResponseData {
            posts: page.posts.iter().map(PostData::from).collect(),
            total: page.total,
            limit: filter.limit,
            offset: filter.offset,
        },
    ))
}

/// Raw query string of the post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListPostsQuery {
    search: Option<String>,
    from: Option<String>,
    to: Option<String>,
    /// Comma separated tag names
    tags: Option<String>,
    sort: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
enum ParseListPostsQueryError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
    Date(String),

    #[error("Invalid tag: {0}")]
    Tag(#[from] TagNameError),
}

impl From<ParseListPostsQueryError> for ApiError {
    fn from(err: ParseListPostsQueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ListPostsQuery {
    fn try_into_filter(self) -> Result<PostFilter, ParseListPostsQueryError> {
        let date_from = self
            .from
            .as_deref()
            .map(|value| parse_bound(value, start_of_day()))
            .transpose()?;
        let date_to = self
            .to
            .as_deref()
            .map(|value| parse_bound(value, end_of_day()))
            .transpose()?;

        let tags = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| TagName::new(name.to_string()))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let filter = PostFilter {
            search: self.search.filter(|search| !search.is_empty()),
            date_from,
            date_to,
            tags,
            sort: self
                .sort
                .as_deref()
                .map(SortDirection::from_param)
                .unwrap_or_default(),
            ..PostFilter::default()
        };

        Ok(filter.with_page(self.limit, self.offset))
    }
}

fn start_of_day() -> NaiveTime {
    NaiveTime::default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or_default()
}

/// A bare date is expanded to `time_of_day` in UTC.
fn parse_bound(
    value: &str,
    time_of_day: NaiveTime,
) -> Result<DateTime<Utc>, ParseListPostsQueryError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(time_of_day)));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| ParseListPostsQueryError::Date(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPostsResponseData {
    pub posts: Vec<PostData>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
