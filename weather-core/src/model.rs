use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use thiserror::Error;

/// Payload stored in place of a response body when a fetch fails.
pub const FETCH_FAILED: &str = "Failed to fetch data.";

/// Temperatures strictly above this are rendered as a warning.
pub const HOT_THRESHOLD_C: f64 = 30.0;

/// One resolved fetch, published by the worker to the render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub query: String,
    /// Raw response body, or [`FETCH_FAILED`].
    pub payload: String,
    pub fetched_at: DateTime<Utc>,
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        self.payload == FETCH_FAILED
    }
}

/// A user-saved city snapshot. The payload is frozen at the time it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favourite {
    pub label: String,
    pub payload: String,
}

impl Favourite {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { label: label.into(), payload: payload.into() }
    }

    pub fn snapshot(&self) -> Result<WeatherSnapshot, SnapshotError> {
        WeatherSnapshot::decode(&self.payload)
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("payload has no `{0}` section")]
    MissingSection(&'static str),

    #[error("`{section}` section is incomplete: {source}")]
    InvalidSection {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub condition: Condition,
    pub temp_c: f64,
    #[serde(deserialize_with = "percent")]
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    #[serde(deserialize_with = "percent")]
    pub cloud: u8,
}

/// Decoded view of a WeatherAPI `current.json` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: Current,
}

impl WeatherSnapshot {
    pub fn decode(payload: &str) -> Result<Self, SnapshotError> {
        let mut value: Value = serde_json::from_str(payload).map_err(SnapshotError::Malformed)?;

        let location = take_section(&mut value, "location")?;
        let current = take_section(&mut value, "current")?;

        Ok(Self {
            location: parse_section("location", location)?,
            current: parse_section("current", current)?,
        })
    }

    pub fn is_hot(&self) -> bool {
        self.current.temp_c > HOT_THRESHOLD_C
    }
}

/// Accepts `64` as well as `64.0`; fractions are truncated.
fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return Err(de::Error::custom(format!("percentage out of range: {value}")));
    }
    Ok(value as u8)
}

fn take_section(value: &mut Value, name: &'static str) -> Result<Value, SnapshotError> {
    value
        .as_object_mut()
        .and_then(|obj| obj.remove(name))
        .ok_or(SnapshotError::MissingSection(name))
}

fn parse_section<T: serde::de::DeserializeOwned>(
    section: &'static str,
    value: Value,
) -> Result<T, SnapshotError> {
    serde_json::from_value(value).map_err(|source| SnapshotError::InvalidSection { section, source })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let snap = WeatherSnapshot::decode(&fixtures::payload("London", "UK", 32.0))
            .expect("payload should decode");

        assert_eq!(snap.location.name, "London");
        assert_eq!(snap.location.country, "UK");
        assert_eq!(snap.current.condition.text, "Partly cloudy");
        assert_eq!(snap.current.humidity, 64);
        assert_eq!(snap.current.wind_dir, "WSW");
        assert_eq!(format!("{:.2}", snap.current.temp_c), "32.00");
        assert!(snap.is_hot());
    }

    #[test]
    fn threshold_is_exclusive() {
        let snap = WeatherSnapshot::decode(&fixtures::payload("Rome", "Italy", 30.0)).unwrap();
        assert!(!snap.is_hot());
    }

    #[test]
    fn failure_sentinel_is_malformed() {
        let err = WeatherSnapshot::decode(FETCH_FAILED).unwrap_err();
        assert!(matches!(err, SnapshotError::Malformed(_)));
    }

    #[test]
    fn missing_current_section() {
        let err = WeatherSnapshot::decode(r#"{"location":{"name":"X","region":"","country":""}}"#)
            .unwrap_err();
        assert!(matches!(err, SnapshotError::MissingSection("current")));
    }

    #[test]
    fn incomplete_section_is_rejected() {
        let err = WeatherSnapshot::decode(
            r#"{"location":{"name":"X","region":"","country":""},"current":{"temp_c":1.0}}"#,
        )
        .unwrap_err();

        assert!(matches!(err, SnapshotError::InvalidSection { section: "current", .. }));
    }

    #[test]
    fn float_percentages_are_accepted() {
        let payload = fixtures::payload("Oslo", "Norway", 1.0)
            .replace("\"humidity\":64", "\"humidity\":64.0")
            .replace("\"cloud\":75", "\"cloud\":75.5");
        let snap = WeatherSnapshot::decode(&payload).unwrap();

        assert_eq!(snap.current.humidity, 64);
        assert_eq!(snap.current.cloud, 75);
    }

    #[test]
    fn negative_percentage_is_rejected() {
        let payload =
            fixtures::payload("Oslo", "Norway", 1.0).replace("\"cloud\":75", "\"cloud\":-5");
        let err = WeatherSnapshot::decode(&payload).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidSection { section: "current", .. }));
    }

    #[test]
    fn non_object_payload_has_no_sections() {
        let err = WeatherSnapshot::decode("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, SnapshotError::MissingSection("location")));
    }
}
