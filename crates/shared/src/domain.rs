use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

/// Device position as reported by the location sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    New,
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Other(status) => status,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

impl From<String> for TicketStatus {
    fn from(value: String) -> Self {
        if value == "new" {
            Self::New
        } else {
            Self::Other(value)
        }
    }
}

impl From<TicketStatus> for String {
    fn from(value: TicketStatus) -> Self {
        match value {
            TicketStatus::New => "new".to_string(),
            TicketStatus::Other(status) => status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub category: String,
    #[serde(default)]
    pub ai_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    #[serde(default)]
    pub transcription: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A processed grievance as stored and returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TicketId>,
    pub status: TicketStatus,
    pub image: ImageAnalysis,
    #[serde(default)]
    pub audio: Option<AudioAnalysis>,
    #[serde(default)]
    pub text_description: Option<String>,
    pub location: GeoPosition,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Ticket {
    /// "{category} at {lat}, {lng}" with coordinates rounded to four decimals.
    pub fn headline(&self) -> String {
        format!("{} at {}", self.image.category, self.location)
    }

    /// The reporter's own words: typed text first, then the voice-note transcription.
    pub fn narrative(&self) -> Option<&str> {
        let text = self
            .text_description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        text.or_else(|| {
            self.audio
                .as_ref()
                .map(|audio| audio.transcription.trim())
                .filter(|transcription| !transcription.is_empty())
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochMillis(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::EpochMillis(millis) => Utc
            .timestamp_millis_opt(millis.round() as i64)
            .single()
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {millis}"))),
        RawTimestamp::Text(text) => parse_text_timestamp(&text)
            .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp: {text}"))),
    }
}

fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
