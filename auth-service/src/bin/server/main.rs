use std::sync::Arc;

use auth::TokenIssuer;
use auth::TokenValidator;
use auth_service::config::Config;
use auth_service::domain::account::service::AuthSessionService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::identity::InMemoryIdentityStore;
use chrono::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        issuer = %config.jwt.issuer,
        audience = %config.jwt.audience,
        token_lifetime_hours = config.jwt.lifetime_hours,
        "Configuration loaded"
    );

    let token_issuer = TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        &config.jwt.issuer,
        &config.jwt.audience,
        Duration::hours(config.jwt.lifetime_hours),
    );
    let token_validator = Arc::new(TokenValidator::new(
        config.jwt.secret.as_bytes(),
        &config.jwt.issuer,
        &config.jwt.audience,
    ));

    let identity_store = Arc::new(InMemoryIdentityStore::new());
    let auth_service = Arc::new(AuthSessionService::new(
        identity_store,
        token_issuer,
        TokenValidator::new(
            config.jwt.secret.as_bytes(),
            &config.jwt.issuer,
            &config.jwt.audience,
        ),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, token_validator);
    axum::serve(http_listener, application).await?;

    Ok(())
}
