use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usergate_user_rpc::user_server;
use usergate_user_service::{config::UserServiceConfig, svc::ServiceContext};

#[tokio::main]
async fn main() {
    if std::env::var("DOCKER_CONTAINER").as_deref() != Ok("true") {
        dotenvy::dotenv().ok();
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,usergate_user_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = UserServiceConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let ctx = ServiceContext::new(&config)
        .await
        .expect("failed to initialize service context");

    tracing::info!("listening on {}", config.listen_on);

    tonic::transport::Server::builder()
        .timeout(config.rpc_timeout())
        .add_service(user_server(ctx.logic()))
        .serve_with_shutdown(config.listen_on, shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("user service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
