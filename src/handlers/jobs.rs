// src/handlers/jobs.rs
use log::{error, info, warn};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{with_status, Json, WithStatus};
use warp::Rejection;

use super::error::ApiError;
use crate::services::error::JobError;
use crate::services::job::{job_status, HoroscopeJob};

/// Run the daily job now and answer with its status object.
///
/// The run is spawned so a dropped request does not cancel it part-way.
pub async fn trigger_daily_job(job: Arc<HoroscopeJob>) -> Result<WithStatus<Json>, Rejection> {
    info!("Handling request to run the daily horoscope job");

    let result = match tokio::spawn(async move { job.run().await }).await {
        Ok(result) => result,
        Err(e) => {
            error!("Horoscope run task did not complete: {}", e);
            return Err(warp::reject::custom(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("horoscope run aborted: {}", e),
            )));
        }
    };

    if let Err(JobError::AlreadyRunning) = result {
        warn!("Rejecting job trigger: run already in progress");
        return Err(warp::reject::custom(ApiError::conflict(
            JobError::AlreadyRunning.to_string(),
        )));
    }

    let status = job_status(&result);
    let code = StatusCode::from_u16(status.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(with_status(warp::reply::json(&status), code))
}

pub async fn get_job_state(job: Arc<HoroscopeJob>) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&job.state()))
}
