use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

/// OpenWeatherMap API client for current conditions and the 3-hourly forecast
pub struct OpenWeatherApi {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Static API key; the service accepts it without further authentication.
const API_KEY: &str = "8ce6e15d64d5b0620181ac460c756bf7";

/// One reading of the present conditions for a city, temperatures already
/// converted to whole degrees Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading {
    pub temp_c: i32,
    pub feels_like_c: i32,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
}

/// One 3-hour forecast slot, carrying the label hour of its timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    /// Slot time as epoch seconds, as reported by the provider.
    pub dt: i64,
    /// Hour-of-day label derived from `dt` (UTC).
    pub hour: u32,
    pub temp_c: i32,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainReadings,
    wind: WindReading,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct WindReading {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct ForecastSlot {
    dt: i64,
    main: ForecastMain,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

/// Current readings truncate the 273 offset; forecast slots truncate 273.15.
/// The two constants differ on purpose to match the upstream behavior.
pub fn kelvin_to_c_current(kelvin: f64) -> i32 {
    (kelvin - 273.0) as i32
}

pub fn kelvin_to_c_forecast(kelvin: f64) -> i32 {
    (kelvin - 273.15) as i32
}

/// Hour-of-day label for an epoch-seconds timestamp.
pub fn hour_label(dt: i64) -> u32 {
    ((dt / 3600) % 24) as u32
}

impl OpenWeatherApi {
    /// Create a new OpenWeatherMap client
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: API_KEY.to_string(),
        })
    }

    fn weather_url(&self, city: &str) -> String {
        format!("{}/weather?q={}&appid={}", self.base_url, city, self.api_key)
    }

    fn forecast_url(&self, city: &str) -> String {
        format!("{}/forecast?q={}&appid={}", self.base_url, city, self.api_key)
    }

    /// Fetch present conditions for a city.
    ///
    /// Returns `Ok(None)` on any non-success status (unknown city included);
    /// the caller decides how to present that.
    pub async fn fetch_current(&self, city: &str) -> Result<Option<CurrentReading>> {
        let url = self.weather_url(city);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let data: WeatherResponse = response.json().await?;
        Ok(Some(CurrentReading {
            temp_c: kelvin_to_c_current(data.main.temp),
            feels_like_c: kelvin_to_c_current(data.main.feels_like),
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            wind_speed: data.wind.speed,
        }))
    }

    /// Fetch the 3-hourly forecast for a city, in provider order.
    ///
    /// Returns `Ok(None)` on any non-success status.
    pub async fn fetch_forecast(&self, city: &str) -> Result<Option<Vec<ForecastPoint>>> {
        let url = self.forecast_url(city);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let data: ForecastResponse = response.json().await?;
        let points = data
            .list
            .iter()
            .map(|slot| ForecastPoint {
                dt: slot.dt,
                hour: hour_label(slot.dt),
                temp_c: kelvin_to_c_forecast(slot.main.temp),
            })
            .collect();
        Ok(Some(points))
    }
}
