use astrokiran_horoscopes::config::Config;
use astrokiran_horoscopes::services::scheduler::start_daily_schedule;
use astrokiran_horoscopes::{build_job, routes};
use dotenv::dotenv;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the horoscope service...");

    let config = Config::from_env()?;
    let job = Arc::new(build_job(&config).await?);

    // Keep the scheduler handle alive for the lifetime of the server
    let _scheduler = start_daily_schedule(job.clone(), &config.cron).await?;

    // Bind to 0.0.0.0 so the platform router can reach us
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(job).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
