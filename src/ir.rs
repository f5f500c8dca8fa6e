use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

pub const DEFAULT_DESCRIPTION: &str = "Event";
pub const DEFAULT_EVENT_COLOR: &str = "#607D8B";

/// Which side of the axis a label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[serde(alias = "top", alias = "above")]
    Up,
    #[serde(alias = "bottom", alias = "below")]
    Down,
}

impl Placement {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "up" | "top" | "above" => Some(Self::Up),
            "down" | "bottom" | "below" => Some(Self::Down),
            _ => None,
        }
    }

    /// Side given by the alternate policy for a position in the sorted list.
    pub fn alternating(index: usize) -> Self {
        if index % 2 == 0 { Self::Up } else { Self::Down }
    }
}

/// Stable handle for an event inside a [`crate::timeline::Timeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub usize);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Caller-facing event description; optional fields take documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, alias = "data", skip_serializing_if = "serde_json::Value::is_null")]
    pub custom: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl EventInput {
    pub fn new(date: NaiveDateTime) -> Self {
        Self {
            date,
            description: None,
            color: None,
            custom: serde_json::Value::Null,
            placement: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn with_custom(mut self, custom: serde_json::Value) -> Self {
        self.custom = custom;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub id: EventId,
    pub date: NaiveDateTime,
    pub description: String,
    pub color: String,
    pub custom: serde_json::Value,
    /// Explicit side requested by the caller, if any.
    pub requested_placement: Option<Placement>,
    /// Side in effect for the latest layout pass.
    pub placement: Placement,
}

impl TimelineEvent {
    pub fn from_input(id: EventId, input: EventInput) -> Self {
        Self {
            id,
            date: input.date,
            description: input
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            color: input.color.unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            custom: input.custom,
            requested_placement: input.placement,
            placement: input.placement.unwrap_or(Placement::Up),
        }
    }

    /// Milliseconds since the epoch, used for axis interpolation.
    pub fn time(&self) -> f64 {
        self.date.and_utc().timestamp_millis() as f64
    }
}

/// Partial update. `None` leaves a field untouched; `Some(None)` on the
/// optional text fields restores the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub date: Option<NaiveDateTime>,
    pub description: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub custom: Option<serde_json::Value>,
    pub placement: Option<Option<Placement>>,
}

impl EventUpdate {
    pub(crate) fn apply(self, event: &mut TimelineEvent) {
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(description) = self.description {
            event.description = description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        }
        if let Some(color) = self.color {
            event.color = color.unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string());
        }
        if let Some(custom) = self.custom {
            event.custom = custom;
        }
        if let Some(placement) = self.placement {
            event.requested_placement = placement;
        }
    }
}

const DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Accepts `YYYY-MM-DD`, date-times with `T` or space, and RFC 3339.
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, TimelineError> {
    let value = raw.trim();
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(datetime) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(datetime);
    }
    for format in DATE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime);
        }
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.naive_utc());
    }
    Err(TimelineError::InvalidDate(value.to_string()))
}

mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
