use unicrush_api::config::AppConfig;
use unicrush_api::{build_router, build_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    unicrush_shared::telemetry::init_tracing("unicrush-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let state = build_state(config);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "unicrush-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
