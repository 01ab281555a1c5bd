// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::horoscopes::{get_daily_horoscopes, get_horoscope_by_sign};
use crate::handlers::jobs::{get_job_state, trigger_daily_job};
use crate::services::job::HoroscopeJob;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(job: Arc<HoroscopeJob>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let job_filter = warp::any().map(move || job.clone());

    let daily_route = warp::path!("api" / "v1" / "horoscopes")
        .and(warp::get())
        .and(job_filter.clone())
        .and_then(get_daily_horoscopes);

    let sign_route = warp::path!("api" / "v1" / "horoscopes" / String)
        .and(warp::get())
        .and(job_filter.clone())
        .and_then(get_horoscope_by_sign);

    let trigger_route = warp::path!("api" / "v1" / "jobs" / "daily-horoscopes")
        .and(warp::post())
        .and(job_filter.clone())
        .and_then(trigger_daily_job);

    let state_route = warp::path!("api" / "v1" / "jobs" / "daily-horoscopes")
        .and(warp::get())
        .and(job_filter.clone())
        .and_then(get_job_state);

    info!("All routes configured successfully.");

    daily_route
        .or(sign_route)
        .or(trigger_route)
        .or(state_route)
        .recover(handle_rejection)
}
