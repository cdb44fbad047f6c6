use framecast_core::Config;
use framecast_server::{build_router, server, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let state = AppState::new(config.clone())?;
    let router = build_router(state);

    server::start_server(&config, router).await?;

    Ok(())
}
