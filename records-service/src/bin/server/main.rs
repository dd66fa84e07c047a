use std::sync::Arc;

use auth::Authenticator;
use auth::CredentialHasher;
use auth::JwtHandler;
use records_service::config::Config;
use records_service::domain::access::guard::AccessGuard;
use records_service::domain::identity::service::IdentityService;
use records_service::domain::patient::service::PatientService;
use records_service::inbound::http::router::create_router;
use records_service::outbound::store::StoreSelector;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "records_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "records-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        store_configured = config.store.url.is_some(),
        fallback_to_emulated = config.store.fallback_to_emulated,
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        token_ttl_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let credential_hasher = CredentialHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let jwt_handler =
        JwtHandler::with_algorithm(config.jwt.secret.as_bytes(), &config.jwt.algorithm)?;
    let authenticator = Arc::new(Authenticator::from_parts(credential_hasher, jwt_handler));

    let selector = StoreSelector::new();
    let backend = selector
        .connect(&config.store, authenticator.hasher())
        .await?;
    let store = selector.get_store().await;
    tracing::info!(backend = %backend, "Document store selected");

    let identity_service = Arc::new(IdentityService::new(
        store.clone(),
        Arc::clone(&authenticator),
        config.jwt.token_ttl(),
    ));
    let patient_service = Arc::new(PatientService::new(store.clone()));
    let guard = AccessGuard::new(Arc::clone(&authenticator));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(identity_service, patient_service, guard, store);

    if let Err(e) = axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    selector.shutdown().await;
    tracing::info!("Server exited");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
