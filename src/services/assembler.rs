// src/services/assembler.rs
use serde_json::Value;

use super::error::AssemblyError;
use super::provider::{RawDetail, RawSummary};
use crate::models::{HoroscopePrediction, ZodiacSign};

/// Merge the summary and detail payloads for one sign into a storable record.
///
/// Every field is required. A missing or `null` field fails the whole record
/// instead of being stored half-filled.
pub fn assemble(
    zodiac: ZodiacSign,
    date: &str,
    timestamp: &str,
    summary: &RawSummary,
    detail: &RawDetail,
) -> Result<HoroscopePrediction, AssemblyError> {
    let prediction = required(&summary.0, "summary", "bot_response")?;

    let categories = required(&detail.0, "detail", "bot_response")?;
    let category = |name: &str| required(&categories, "detail.bot_response", name);

    Ok(HoroscopePrediction {
        zodiac: zodiac.key(),
        date: date.to_string(),
        prediction,
        timestamp: timestamp.to_string(),
        lucky_color: required(&detail.0, "detail", "lucky_color")?,
        lucky_number: required(&detail.0, "detail", "lucky_number")?,
        physique: category("physique")?,
        status: category("status")?,
        finances: category("finances")?,
        relationship: category("relationship")?,
        career: category("career")?,
        travel: category("travel")?,
        family: category("family")?,
        friends: category("friends")?,
        health: category("health")?,
        total_score: required(&detail.0, "detail", "total_score")?,
    })
}

fn required(payload: &Value, payload_name: &'static str, field: &str) -> Result<Value, AssemblyError> {
    match payload.get(field) {
        Some(Value::Null) | None => Err(AssemblyError::MissingField {
            payload: payload_name,
            field: field.to_string(),
        }),
        Some(value) => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_payload() -> Value {
        json!({
            "lucky_color": "red",
            "lucky_number": 7,
            "total_score": 85,
            "bot_response": {
                "physique": {"score": 70, "split_response": "Energy is high."},
                "status": {"score": 60, "split_response": "Recognition is near."},
                "finances": {"score": 80, "split_response": "Spend wisely."},
                "relationship": {"score": 90, "split_response": "Warm day."},
                "career": {"score": 75, "split_response": "Push the project."},
                "travel": {"score": 40, "split_response": "Stay local."},
                "family": {"score": 88, "split_response": "Call home."},
                "friends": {"score": 66, "split_response": "Reconnect."},
                "health": {"score": 72, "split_response": "Sleep early."}
            }
        })
    }

    #[test]
    fn merges_summary_and_detail() {
        let summary = RawSummary(json!({"bot_response": {"overview": "A bright day."}}));
        let detail = RawDetail(detail_payload());

        let record = assemble(
            ZodiacSign::Aries,
            "01/01/2025",
            "2025-01-01T00:35:00.000Z",
            &summary,
            &detail,
        )
        .unwrap();

        assert_eq!(record.zodiac, "1");
        assert_eq!(record.date, "01/01/2025");
        assert_eq!(record.timestamp, "2025-01-01T00:35:00.000Z");
        assert_eq!(record.prediction, json!({"overview": "A bright day."}));
        assert_eq!(record.lucky_color, json!("red"));
        assert_eq!(record.lucky_number, json!(7));
        assert_eq!(record.total_score, json!(85));
        assert_eq!(record.career["split_response"], "Push the project.");
        assert_eq!(record.health["score"], 72);
    }

    #[test]
    fn missing_summary_prediction_fails() {
        let summary = RawSummary(json!({"sun_sign": "Aries"}));
        let detail = RawDetail(detail_payload());
        let err = assemble(ZodiacSign::Aries, "01/01/2025", "t", &summary, &detail).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::MissingField {
                payload: "summary",
                field: "bot_response".to_string()
            }
        );
    }

    #[test]
    fn missing_category_fails_instead_of_defaulting() {
        let mut payload = detail_payload();
        payload["bot_response"]
            .as_object_mut()
            .unwrap()
            .remove("travel");
        let summary = RawSummary(json!({"bot_response": "ok"}));
        let err = assemble(ZodiacSign::Leo, "01/01/2025", "t", &summary, &RawDetail(payload)).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::MissingField {
                payload: "detail.bot_response",
                field: "travel".to_string()
            }
        );
    }

    #[test]
    fn null_lucky_field_counts_as_missing() {
        let mut payload = detail_payload();
        payload["lucky_number"] = Value::Null;
        let summary = RawSummary(json!({"bot_response": "ok"}));
        let err = assemble(ZodiacSign::Leo, "01/01/2025", "t", &summary, &RawDetail(payload)).unwrap_err();
        assert!(matches!(err, AssemblyError::MissingField { field, .. } if field == "lucky_number"));
    }
}
