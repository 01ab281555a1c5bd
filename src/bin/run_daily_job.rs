// src/bin/run_daily_job.rs
use astrokiran_horoscopes::build_job;
use astrokiran_horoscopes::config::Config;
use astrokiran_horoscopes::models::JobStatus;
use astrokiran_horoscopes::services::job::job_status;
use dotenv::dotenv;
use log::{error, info};

/// One-shot run for an external scheduler. Prints the status object and exits
/// non-zero when the run failed.
#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let status = match run().await {
        Ok(status) => status,
        Err(e) => {
            error!("Failed to set up horoscope job: {:#}", e);
            JobStatus::failure("Error fetching and storing horoscopes", e.to_string())
        }
    };

    match serde_json::to_string_pretty(&status) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialise job status: {}", e),
    }

    if !status.is_success() {
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<JobStatus> {
    let config = Config::from_env()?;
    let job = build_job(&config).await?;

    info!("Running daily horoscope job once...");
    let result = job.run().await;
    Ok(job_status(&result))
}
