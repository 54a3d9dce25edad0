use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use crm_backend::services::snapshot_service::SnapshotService;
use crm_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes,
    utils::time,
    AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    // Daily snapshot freezer: keeps last month's row frozen without waiting
    // for anyone to call the freeze route.
    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                let month = SnapshotService::previous_month(time::now());
                if let Err(e) = state.snapshot_service.freeze_month(month).await {
                    tracing::error!(error = ?e, "Snapshot freeze worker error");
                }
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
            }
        });
    }

    let app = routes::api_router(app_state, config.api_rps)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
