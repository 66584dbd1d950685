use std::sync::Arc;

use auth::Authenticator;
use auth::TokenSettings;
use feed_service::config::Config;
use feed_service::domain::auth::service::AuthService;
use feed_service::domain::post::service::PostService;
use feed_service::domain::user::service::UserService;
use feed_service::inbound::http::router::create_router;
use feed_service::inbound::http::router::AppState;
use feed_service::outbound::database::PostgresDatabase;
use feed_service::outbound::email::SmtpEmailSender;
use feed_service::repositories::PostgresFollowerRepository;
use feed_service::repositories::PostgresPostRepository;
use feed_service::repositories::PostgresRoleRepository;
use feed_service::repositories::PostgresTagRepository;
use feed_service::repositories::PostgresTokenRepository;
use feed_service::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feed_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "feed-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        environment = ?config.environment,
        http_port = config.server.http_port,
        statement_timeout_secs = config.database.statement_timeout_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let database = Arc::new(PostgresDatabase::new(
        pg_pool,
        config.database.statement_timeout(),
    ));
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        TokenSettings {
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.audience.clone(),
            expiration_hours: config.jwt.expiration_hours,
        },
    ));
    let email_sender = Arc::new(SmtpEmailSender::new(&config.smtp, config.environment)?);

    let user_repository = Arc::new(PostgresUserRepository::new());
    let role_repository = Arc::new(PostgresRoleRepository::new());
    let token_repository = Arc::new(PostgresTokenRepository::new());
    let post_repository = Arc::new(PostgresPostRepository::new());
    let tag_repository = Arc::new(PostgresTagRepository::new());
    let follower_repository = Arc::new(PostgresFollowerRepository::new());

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&database),
        Arc::clone(&user_repository),
        role_repository,
        token_repository,
        email_sender,
        Arc::clone(&authenticator),
        config.web.base_url.clone(),
    ));
    let post_service = Arc::new(PostService::new(
        Arc::clone(&database),
        Arc::clone(&user_repository),
        post_repository,
        tag_repository,
    ));
    let user_service = Arc::new(UserService::new(
        database,
        user_repository,
        follower_repository,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(AppState {
        auth_service,
        post_service,
        user_service,
        authenticator,
    });

    axum::serve(http_listener, http_application).await?;
    tracing::info!("Server exited");

    Ok(())
}
