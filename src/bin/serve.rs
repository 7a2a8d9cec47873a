use anyhow::Result;
use group_calendar::{
    config::SheetConfig,
    fetch::SheetLoader,
    logging,
    server::{routes, AppState},
};
use std::env;
use tracing::info;
use warp::Filter;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info");
    info!("Starting group calendar service");

    let config = SheetConfig::from_env()?;
    let state = AppState::new(SheetLoader::from_config(&config)?, &config.marker);

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    info!("Server starting on port {}", port);
    info!("Calendar page: http://localhost:{}/", port);

    warp::serve(routes(state).with(warp::trace::request()))
        .run(([0, 0, 0, 0], port))
        .await;

    Ok(())
}
