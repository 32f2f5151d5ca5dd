use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;

/// Visual Crossing timeline API client for historical weather series
pub struct VisualCrossingApi {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Static API key; the service accepts it without further authentication.
const API_KEY: &str = "5K77AMRZV84RCLG8R7BLNG498";

/// Sampling frequency for a timeline query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Hourly,
    ThreeHourly,
    SixHourly,
    TwelveHourly,
    Daily,
}

impl Frequency {
    pub const LABELS: [&'static str; 5] = ["1h", "3h", "6h", "12h", "1d"];

    /// Hour stride within a day: every `stride()`-th hour record is kept.
    pub fn stride(self) -> usize {
        match self {
            Frequency::Hourly => 1,
            Frequency::ThreeHourly => 3,
            Frequency::SixHourly => 6,
            Frequency::TwelveHourly => 12,
            Frequency::Daily => 24,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Hourly => "1h",
            Frequency::ThreeHourly => "3h",
            Frequency::SixHourly => "6h",
            Frequency::TwelveHourly => "12h",
            Frequency::Daily => "1d",
        }
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1h" => Ok(Frequency::Hourly),
            "3h" => Ok(Frequency::ThreeHourly),
            "6h" => Ok(Frequency::SixHourly),
            "12h" => Ok(Frequency::TwelveHourly),
            "1d" => Ok(Frequency::Daily),
            other => Err(anyhow!(
                "invalid frequency '{}', expected one of {:?}",
                other,
                Frequency::LABELS
            )),
        }
    }
}

/// One sampled observation from the timeline response
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    /// Minute-precision local timestamp of the observation.
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub windspeed: f64,
}

#[derive(Debug, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub days: Vec<TimelineDay>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineDay {
    /// Date string in `YYYY-MM-DD` form.
    pub datetime: String,
    #[serde(default)]
    pub hours: Vec<TimelineHour>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineHour {
    /// Time string in `HH:MM:SS` form.
    pub datetime: String,
    pub temp: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub windspeed: f64,
}

/// Parse a `YYYY-MM-DD` date, labeling the failing field in the error.
pub fn parse_date(raw: &str, which: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid {} date '{}': {}", which, raw, e))
}

/// Strict `YYYY-MM-DD` shape check, applied before parsing.
fn is_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

/// Walk the per-day, per-hour response structure and keep every hour whose
/// 0-based index within its day is a multiple of `stride`. Records come out
/// in provider order: all of one day's kept hours before the next day's.
///
/// `window`, when given, restricts the walk to days whose date string falls
/// inside `start..=end` (ISO dates compare correctly as strings).
pub fn extract_records(
    response: &TimelineResponse,
    stride: usize,
    window: Option<(&str, &str)>,
) -> Result<Vec<WeatherRecord>> {
    let mut records = Vec::new();
    for day in &response.days {
        if let Some((start, end)) = window {
            if day.datetime.as_str() < start || day.datetime.as_str() > end {
                continue;
            }
        }
        for (i, hour) in day.hours.iter().enumerate() {
            if i % stride != 0 {
                continue;
            }
            let stamp = format!("{} {}", day.datetime, hour.datetime);
            let timestamp = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| anyhow!("invalid record timestamp '{}': {}", stamp, e))?;
            records.push(WeatherRecord {
                timestamp,
                temperature: hour.temp,
                pressure: hour.pressure,
                humidity: hour.humidity,
                windspeed: hour.windspeed,
            });
        }
    }
    Ok(records)
}

impl VisualCrossingApi {
    /// Create a new Visual Crossing timeline client
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services"
                .to_string(),
            api_key: API_KEY.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
        }
    }

    fn timeline_url(&self, city: &str, start_date: &str, end_date: &str) -> String {
        format!(
            "{}/timeline/{}/{}/{}?key={}",
            self.base_url, city, start_date, end_date, self.api_key
        )
    }

    /// Fetch a sampled series for the deviation view.
    ///
    /// Dates are validated only by parsing; the frequency string is looked up
    /// lazily, so an unrecognized value only fails once a successful response
    /// is being reshaped. Result days are filtered to the requested window.
    /// Any non-success status yields `Ok(None)`.
    pub async fn fetch_deviation_series(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
        frequency: &str,
    ) -> Result<Option<Vec<WeatherRecord>>> {
        parse_date(start_date, "start")?;
        parse_date(end_date, "end")?;

        let url = self.timeline_url(city, start_date, end_date);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let data: TimelineResponse = response.json().await?;
        let stride = Frequency::from_str(frequency)?.stride();
        let records = extract_records(&data, stride, Some((start_date, end_date)))?;
        Ok(Some(records))
    }

    /// Fetch a sampled series for the averages view.
    ///
    /// Unlike the deviation variant, everything is validated up front, before
    /// any network traffic: frequency membership, strict date shape, date
    /// parse, and range order. Any non-success status yields `Ok(None)`.
    pub async fn fetch_average_series(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
        frequency: &str,
    ) -> Result<Option<Vec<WeatherRecord>>> {
        let frequency = Frequency::from_str(frequency)?;

        if !is_iso_date_shape(start_date) {
            return Err(anyhow!(
                "invalid start date format '{}', expected YYYY-MM-DD",
                start_date
            ));
        }
        if !is_iso_date_shape(end_date) {
            return Err(anyhow!(
                "invalid end date format '{}', expected YYYY-MM-DD",
                end_date
            ));
        }

        let start = parse_date(start_date, "start")?;
        let end = parse_date(end_date, "end")?;
        if start > end {
            return Err(anyhow!("start date must not be after end date"));
        }

        let url = self.timeline_url(city, start_date, end_date);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let data: TimelineResponse = response.json().await?;
        let records = extract_records(&data, frequency.stride(), None)?;
        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(time: &str, temp: f64) -> TimelineHour {
        TimelineHour {
            datetime: time.to_string(),
            temp,
            pressure: 1015.0,
            humidity: 70.0,
            windspeed: 3.0,
        }
    }

    fn full_day(date: &str) -> TimelineDay {
        TimelineDay {
            datetime: date.to_string(),
            hours: (0..24)
                .map(|h| hour(&format!("{:02}:00:00", h), 10.0 + h as f64))
                .collect(),
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_frequency_strides() {
        for (label, stride) in [("1h", 1), ("3h", 3), ("6h", 6), ("12h", 12), ("1d", 24)] {
            assert_eq!(Frequency::from_str(label).unwrap().stride(), stride);
        }
        assert!(Frequency::from_str("2h").is_err());
        assert!(Frequency::from_str("").is_err());
    }

    #[test]
    fn test_single_day_stride_one_starts_at_midnight() {
        let response = TimelineResponse {
            days: vec![full_day("2024-12-17")],
        };
        let records = extract_records(&response, 1, None).unwrap();
        assert_eq!(records.len(), 24);
        assert_eq!(records[0].timestamp, at("2024-12-17", "00:00:00"));
    }

    #[test]
    fn test_two_days_keep_provider_order() {
        let response = TimelineResponse {
            days: vec![full_day("2024-12-16"), full_day("2024-12-17")],
        };
        let records = extract_records(&response, 1, None).unwrap();
        assert_eq!(records.len(), 48);
        // the first day's later hours come before the second day's midnight
        assert_ne!(records[1].timestamp, at("2024-12-17", "00:00:00"));
        assert_eq!(records[1].timestamp, at("2024-12-16", "01:00:00"));
        assert_eq!(records[24].timestamp, at("2024-12-17", "00:00:00"));
    }

    #[test]
    fn test_stride_keeps_every_nth_hour() {
        let response = TimelineResponse {
            days: vec![full_day("2024-12-17")],
        };
        let records = extract_records(&response, 3, None).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[1].timestamp, at("2024-12-17", "03:00:00"));

        let daily = extract_records(&response, 24, None).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].timestamp, at("2024-12-17", "00:00:00"));
    }

    #[test]
    fn test_window_filter_drops_out_of_range_days() {
        let response = TimelineResponse {
            days: vec![
                full_day("2024-12-16"),
                full_day("2024-12-17"),
                full_day("2024-12-18"),
            ],
        };
        let records =
            extract_records(&response, 24, Some(("2024-12-16", "2024-12-17"))).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].timestamp, at("2024-12-17", "00:00:00"));
    }

    #[test]
    fn test_day_without_hours_contributes_nothing() {
        let response = TimelineResponse {
            days: vec![TimelineDay {
                datetime: "2024-12-17".to_string(),
                hours: Vec::new(),
            }],
        };
        assert!(extract_records(&response, 1, None).unwrap().is_empty());
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "days": [
                {
                    "datetime": "2024-12-17",
                    "hours": [
                        {"datetime": "00:00:00", "temp": 31.5, "pressure": 1021.0,
                         "humidity": 86.2, "windspeed": 9.4}
                    ]
                }
            ]
        }"#;
        let parsed: TimelineResponse = serde_json::from_str(body).unwrap();
        let records = extract_records(&parsed, 1, None).unwrap();
        assert_eq!(records[0].timestamp, at("2024-12-17", "00:00:00"));
        assert_eq!(records[0].temperature, 31.5);
        assert_eq!(records[0].windspeed, 9.4);
    }

    #[test]
    fn test_missing_days_key_parses_as_empty() {
        let parsed: TimelineResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.days.is_empty());
    }

    #[test]
    fn test_timeline_url_construction() {
        let api = VisualCrossingApi::new().unwrap();
        assert_eq!(
            api.timeline_url("Moscow", "2024-12-16", "2024-12-17"),
            format!(
                "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/Moscow/2024-12-16/2024-12-17?key={}",
                API_KEY
            )
        );
    }

    #[test]
    fn test_date_shape_check() {
        assert!(is_iso_date_shape("2024-12-17"));
        assert!(is_iso_date_shape("2023-99-99"));
        assert!(!is_iso_date_shape("2024-1-7"));
        assert!(!is_iso_date_shape("17-12-2024"));
        assert!(!is_iso_date_shape("2024/12/17"));
        assert!(!is_iso_date_shape(""));
    }

    // The base URL below is unroutable: if validation did not run before the
    // request, these would fail with a connection error instead.
    #[tokio::test]
    async fn test_average_rejects_malformed_date_before_any_request() {
        let api = VisualCrossingApi::with_base_url("http://127.0.0.1:9");
        let err = api
            .fetch_average_series("Moscow", "2023-99-99", "2023-10-10", "1h")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("date"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_average_rejects_unknown_frequency_before_any_request() {
        let api = VisualCrossingApi::with_base_url("http://127.0.0.1:9");
        let err = api
            .fetch_average_series("Moscow", "2023-10-01", "2023-10-10", "2h")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("frequency"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_average_rejects_reversed_range_before_any_request() {
        let api = VisualCrossingApi::with_base_url("http://127.0.0.1:9");
        let err = api
            .fetch_average_series("Moscow", "2023-10-10", "2023-10-01", "1h")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("start date"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_deviation_does_not_screen_frequency_up_front() {
        // the deviation variant reaches the network with an unknown frequency,
        // so against an unroutable host the failure is the connection, not a
        // frequency validation error
        let api = VisualCrossingApi::with_base_url("http://127.0.0.1:9");
        let err = api
            .fetch_deviation_series("Moscow", "2023-10-01", "2023-10-10", "2h")
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("frequency"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_deviation_still_rejects_malformed_dates() {
        let api = VisualCrossingApi::with_base_url("http://127.0.0.1:9");
        let err = api
            .fetch_deviation_series("Moscow", "not-a-date", "2023-10-10", "1h")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("date"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_api_creation() {
        let api = VisualCrossingApi::new();
        assert!(api.is_ok());
    }
}
