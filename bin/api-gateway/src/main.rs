use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usergate_api_gateway::{config::GatewayConfig, routes, state::AppState};
use usergate_identity::IdentityProviderClient;
use usergate_infra::{BrokerClient, CacheClient};
use usergate_user_rpc::UserRpcClient;

#[tokio::main]
async fn main() {
    if std::env::var("DOCKER_CONTAINER").as_deref() != Ok("true") {
        dotenvy::dotenv().ok();
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = GatewayConfig::from_env().expect("failed to load configuration");
    tracing::info!(issuer = config.oidc.issuer(), "Loaded configuration");

    let identity =
        IdentityProviderClient::new(config.oidc.clone()).expect("failed to build identity client");
    let users = UserRpcClient::connect_lazy(&config.user_rpc.endpoint, config.user_rpc.timeout())
        .expect("invalid user service endpoint");

    let mut state = AppState::new(Arc::new(identity), Arc::new(users));
    if let Some(cache_config) = &config.cache {
        let cache = CacheClient::connect(cache_config)
            .await
            .expect("failed to connect to cache");
        state = state.with_cache(cache);
    }
    if let Some(broker_config) = &config.broker {
        let broker = BrokerClient::connect(broker_config)
            .await
            .expect("failed to connect to broker");
        state = state.with_broker(broker);
    }

    let app = routes::router(Arc::new(state), config.request_timeout());

    let addr = config.listen_on();
    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("gateway stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
