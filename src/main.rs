use chrono::Local;
use school_dashboard::{
    AppConfig, AppState, Dashboard, api_client::ApiClient, format::RussianFormatter, load_filters,
    router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let filters = load_filters(&config.data_path).await;
    let dashboard = Dashboard::new(
        filters,
        Local::now().date_naive(),
        Arc::new(RussianFormatter),
        config.items_per_page,
    );

    let api = match &config.api_url {
        Some(url) => {
            info!("using analytics backend at {url}");
            Some(ApiClient::new(url.clone(), config.api_timeout, config.api_retries)?)
        }
        None => None,
    };

    let app = router(AppState::new(config.data_path.clone(), dashboard, api));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
