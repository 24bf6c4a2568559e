use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use food_storefront::{
    config::AppConfig,
    gateway::HttpGateway,
    routes::create_app,
    session::SessionStore,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,food_storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let gateway = HttpGateway::new(&config.gateway_url, config.gateway_timeout)?;
    let sessions = SessionStore::open(&config.session_store_path).await?;
    tracing::info!(
        gateway = %config.gateway_url,
        sessions = sessions.len().await,
        "storefront edge starting"
    );

    let state = AppState::new(Arc::new(gateway), sessions, config.order_refresh)
        .with_idle_limits(config.history_idle, config.workspace_idle);
    state.spawn_workspace_sweeper();
    let app = create_app(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
