use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vsird::api::{router, AppState};
use vsird::config::DashboardConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vsird=info,vsird_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("vsird-api failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = DashboardConfig::from_env()?;
    let addr = cfg.addr()?;
    tracing::info!(
        beta = cfg.scenario.params.beta,
        gamma = cfg.scenario.params.gamma,
        mu = cfg.scenario.params.mu,
        dt = cfg.scenario.dt,
        t_end = cfg.scenario.t_end,
        "loaded scenario"
    );

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
