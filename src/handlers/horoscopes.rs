// src/handlers/horoscopes.rs
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{HoroscopePrediction, ZodiacSign};
use crate::services::job::HoroscopeJob;

#[derive(Serialize)]
struct DailyHoroscopesResponse {
    date: String,
    horoscopes: Vec<HoroscopePrediction>,
}

/// Today's stored horoscopes, ordered Aries to Pisces.
pub async fn get_daily_horoscopes(job: Arc<HoroscopeJob>) -> Result<Json, Rejection> {
    let date = job.today();
    info!("Handling request for horoscopes on {}", date);

    let horoscopes = job.store().list_for_date(&date).await.map_err(|e| {
        error!("Failed to read horoscopes for {}: {}", date, e);
        warp::reject::custom(ApiError::storage_error(e.to_string()))
    })?;

    Ok(warp::reply::json(&DailyHoroscopesResponse { date, horoscopes }))
}

pub async fn get_horoscope_by_sign(sign: String, job: Arc<HoroscopeJob>) -> Result<Json, Rejection> {
    let zodiac: ZodiacSign = sign
        .parse()
        .map_err(|e: crate::models::UnknownZodiac| warp::reject::custom(ApiError::bad_request(e.to_string())))?;
    let date = job.today();
    info!("Handling request for {} on {}", zodiac, date);

    let record = job.store().get(zodiac, &date).await.map_err(|e| {
        error!("Failed to read {} for {}: {}", zodiac, date, e);
        warp::reject::custom(ApiError::storage_error(e.to_string()))
    })?;

    match record {
        Some(record) => Ok(warp::reply::json(&record)),
        None => Err(warp::reject::custom(ApiError::not_found(format!(
            "No horoscope stored for {} on {}",
            zodiac, date
        )))),
    }
}
