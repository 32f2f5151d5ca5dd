use std::sync::Mutex;

use anyhow::Result;
use log::{error, info};
use once_cell::sync::Lazy;
use slint::ComponentHandle;

use openweather::{ForecastPoint, OpenWeatherApi};

use crate::app::charts::Chart;
use crate::app::temp_scale::TempBand;
use crate::app::{notify, save};
use crate::MainWindow;

/// Bars shown on the first 8 forecast slots, 3 hours apart
const FORECAST_BARS: usize = 8;

// Chart currently shown on the tab, retained for the save action
static FORECAST_CHART: Lazy<Mutex<Option<Chart>>> = Lazy::new(|| Mutex::new(None));

// Public API called from main.rs
pub fn setup_current_callbacks(main_window: &MainWindow) {
    let w_lookup = main_window.as_weak();
    main_window.on_weather_requested(move |city| {
        let w = w_lookup.clone();
        slint::invoke_from_event_loop(move || {
            if let Some(window) = w.upgrade() {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async {
                    if let Err(e) = show_weather(&window, city.as_str()).await {
                        error!("Current weather lookup failed: {e}");
                        notify::show_error(&window, &format!("Weather lookup failed: {}", e));
                    }
                });
            }
        })
        .unwrap();
    });

    let w_save = main_window.as_weak();
    main_window.on_save_forecast_requested(move || {
        if let Some(window) = w_save.upgrade() {
            save::save_chart(&window, &FORECAST_CHART);
        }
    });
}

/// Fill the summary panel and, when the second call succeeds, the forecast
/// bar chart. An empty field never reaches the network.
async fn show_weather(main_window: &MainWindow, city: &str) -> Result<()> {
    if city.trim().is_empty() {
        notify::show_warning(main_window, "Enter a city name.");
        return Ok(());
    }

    let api = OpenWeatherApi::new()?;

    info!("Fetching current conditions for {city}");
    let reading = match api.fetch_current(city).await? {
        Some(reading) => reading,
        None => {
            notify::show_error(main_window, "City not found.");
            return Ok(());
        }
    };

    let band = TempBand::classify(reading.temp_c as f64);
    main_window.set_current_panel_color(band.slint_color());
    main_window.set_current_temp_text(format!("{}°C", reading.temp_c).into());
    main_window.set_current_details_text(
        format!(
            "Feels like: {}°C\nHumidity: {:.0}%\nPressure: {:.0} hPa\nWind speed: {} m/s",
            reading.feels_like_c, reading.humidity, reading.pressure, reading.wind_speed
        )
        .into(),
    );
    main_window.set_current_panel_visible(true);

    info!("Fetching hourly forecast for {city}");
    let points = match api.fetch_forecast(city).await? {
        Some(points) if !points.is_empty() => points,
        // the summary panel stays up even when the forecast call fails
        _ => {
            main_window.set_forecast_chart_visible(false);
            notify::show_error(main_window, "Could not retrieve forecast data.");
            return Ok(());
        }
    };

    let bars: Vec<ForecastPoint> = points.into_iter().take(FORECAST_BARS).collect();
    let chart = Chart::Forecast(bars);
    main_window.set_forecast_chart(chart.to_image()?);
    main_window.set_forecast_chart_visible(true);
    *FORECAST_CHART.lock().unwrap() = Some(chart);

    Ok(())
}
