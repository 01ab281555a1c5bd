// src/models.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The twelve sun signs, numbered the way the provider numbers them (Aries = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZodiacSign {
    Aries = 1,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=12 => Some(Self::ALL[usize::from(id) - 1]),
            _ => None,
        }
    }

    /// Partition key form: "1" through "12".
    pub fn key(self) -> String {
        self.id().to_string()
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownZodiac(pub String);

impl fmt::Display for UnknownZodiac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown zodiac sign '{}'", self.0)
    }
}

impl std::error::Error for UnknownZodiac {}

impl FromStr for ZodiacSign {
    type Err = UnknownZodiac;

    /// Accepts the numeric id ("5") or the English name in any case ("leo").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return ZodiacSign::from_id(id).ok_or_else(|| UnknownZodiac(s.to_string()));
        }
        ZodiacSign::ALL
            .iter()
            .copied()
            .find(|sign| sign.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownZodiac(s.to_string()))
    }
}

impl Serialize for ZodiacSign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for ZodiacSign {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One stored horoscope, keyed by (`zodiac`, `date`).
///
/// Everything apart from the keys and `timestamp` is provider content and is
/// kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoroscopePrediction {
    pub zodiac: String,
    pub date: String,
    pub prediction: Value,
    pub timestamp: String,
    pub lucky_color: Value,
    pub lucky_number: Value,
    pub physique: Value,
    pub status: Value,
    pub finances: Value,
    pub relationship: Value,
    pub career: Value,
    pub travel: Value,
    pub family: Value,
    pub friends: Value,
    pub health: Value,
    pub total_score: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a job invocation hands back to whoever triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: JobStatusBody,
}

impl JobStatus {
    pub fn success(message: impl Into<String>) -> Self {
        JobStatus {
            status_code: 200,
            body: JobStatusBody {
                message: message.into(),
                error: None,
            },
        }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        JobStatus {
            status_code: 500,
            body: JobStatusBody {
                message: message.into(),
                error: Some(error.into()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    NotStarted,
    Running { zodiac: ZodiacSign },
    Completed,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zodiac_ids_follow_calendar_order() {
        assert_eq!(ZodiacSign::ALL.len(), 12);
        for (idx, sign) in ZodiacSign::ALL.iter().enumerate() {
            assert_eq!(usize::from(sign.id()), idx + 1);
            assert_eq!(ZodiacSign::from_id(sign.id()), Some(*sign));
        }
        assert_eq!(ZodiacSign::Aries.id(), 1);
        assert_eq!(ZodiacSign::Pisces.id(), 12);
        assert_eq!(ZodiacSign::from_id(0), None);
        assert_eq!(ZodiacSign::from_id(13), None);
    }

    #[test]
    fn zodiac_parses_from_number_or_name() {
        assert_eq!("5".parse::<ZodiacSign>(), Ok(ZodiacSign::Leo));
        assert_eq!("leo".parse::<ZodiacSign>(), Ok(ZodiacSign::Leo));
        assert_eq!("SAGITTARIUS".parse::<ZodiacSign>(), Ok(ZodiacSign::Sagittarius));
        assert!("13".parse::<ZodiacSign>().is_err());
        assert!("ophiuchus".parse::<ZodiacSign>().is_err());
    }

    #[test]
    fn zodiac_serializes_as_key_string() {
        let json = serde_json::to_string(&ZodiacSign::Virgo).unwrap();
        assert_eq!(json, "\"6\"");
        let back: ZodiacSign = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ZodiacSign::Virgo);
    }

    #[test]
    fn job_status_uses_status_code_field() {
        let ok = serde_json::to_value(JobStatus::success("done")).unwrap();
        assert_eq!(ok["statusCode"], 200);
        assert_eq!(ok["body"]["message"], "done");
        assert!(ok["body"].get("error").is_none());

        let failed = serde_json::to_value(JobStatus::failure("failed", "boom")).unwrap();
        assert_eq!(failed["statusCode"], 500);
        assert_eq!(failed["body"]["error"], "boom");
    }

    #[test]
    fn running_state_names_the_sign() {
        let value = serde_json::to_value(JobState::Running {
            zodiac: ZodiacSign::Gemini,
        })
        .unwrap();
        assert_eq!(value["state"], "running");
        assert_eq!(value["zodiac"], "3");
    }
}
