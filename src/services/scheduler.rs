// src/services/scheduler.rs
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::job::{job_status, HoroscopeJob};

/// Register the daily run on `cron` (six fields, UTC) and start the scheduler.
pub async fn start_daily_schedule(job: Arc<HoroscopeJob>, cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let cron_job = Job::new_async(cron, move |_uuid, _lock| {
        let job = Arc::clone(&job);
        Box::pin(async move {
            info!("Scheduled horoscope run triggered");
            let result = job.run().await;
            let status = job_status(&result);
            if status.is_success() {
                info!("Scheduled run finished: {}", status.body.message);
            } else {
                error!(
                    "Scheduled run failed: {}",
                    status.body.error.as_deref().unwrap_or("unknown error")
                );
            }
        })
    })?;

    scheduler.add(cron_job).await?;
    scheduler.start().await?;
    info!("Daily horoscope job scheduled with cron '{}' (UTC)", cron);

    Ok(scheduler)
}
