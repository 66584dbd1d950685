use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::deactivate_user::deactivate_user;
use super::handlers::delete_post::delete_post;
use super::handlers::follow_user::follow_user;
use super::handlers::get_post::get_post;
use super::handlers::get_user::get_user;
use super::handlers::list_posts::list_posts;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::unfollow_user::unfollow_user;
use super::handlers::update_post::update_post;
use super::middleware::authenticate;
use super::middleware::require_moderator;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:post_id", get(get_post));

    let moderator_routes = Router::new()
        .route("/api/users/:user_id/deactivate", patch(deactivate_user))
        .route_layer(middleware::from_fn(require_moderator));

    let protected_routes = Router::new()
        .route("/api/posts", post(create_post))
        .route("/api/posts/:post_id", put(update_post))
        .route("/api/posts/:post_id", delete(delete_post))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/:user_id/follow", post(follow_user))
        .route("/api/users/:user_id/follow", delete(unfollow_user))
        .merge(moderator_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
