// src/bin/test_provider.rs
use astrokiran_horoscopes::config::Config;
use astrokiran_horoscopes::models::ZodiacSign;
use astrokiran_horoscopes::services::assembler::assemble;
use astrokiran_horoscopes::services::dates::{format_horoscope_date, format_timestamp};
use astrokiran_horoscopes::services::provider::{HoroscopeProvider, VedicAstroClient};
use chrono::Utc;
use dotenv::dotenv;

/// Fetch one sign from the live provider and print the assembled record.
/// Usage: test_provider [sign]   (number or name, defaults to Aries)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let zodiac: ZodiacSign = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => ZodiacSign::Aries,
    };

    let config = Config::from_env()?;
    let client = VedicAstroClient::new(&config)?;

    let now = Utc::now();
    let date = format_horoscope_date(now, config.date_zone);

    let summary = client.fetch_summary(zodiac, &date).await?;
    println!("Summary payload:\n{}", serde_json::to_string_pretty(&summary.0)?);

    let detail = client.fetch_detail(zodiac, &date).await?;
    println!("Detail payload:\n{}", serde_json::to_string_pretty(&detail.0)?);

    let record = assemble(zodiac, &date, &format_timestamp(now), &summary, &detail)?;
    println!("Assembled record:\n{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
