use std::net::SocketAddr;
use std::time::Duration;

use assessment_engine::{
    config::{get_config, init_config},
    middleware::cors::permissive_cors,
    routes,
    storage::open_store,
    AppState,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    init_config()?;
    let config = get_config()?;

    let store = open_store(&config.data_dir, config.seed_demo_data).await?;
    let app_state = AppState::new(store);

    let app = routes::router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(permissive_cors())
            .layer(TimeoutLayer::new(Duration::from_secs(30))),
    );

    let addr: SocketAddr = config.server_address.parse()?;
    info!(
        resume_policy = %config.resume_policy,
        data_dir = %config.data_dir.display(),
        "Server listening on {}",
        addr
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
