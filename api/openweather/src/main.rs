extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use openweather::OpenWeatherApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let city = if args.len() >= 2 {
        args[1].clone()
    } else {
        info!("Usage: {} <city>", args[0]);
        info!("Using default city (Moscow)...");
        "Moscow".to_string()
    };

    let api = OpenWeatherApi::new()?;

    match api.fetch_current(&city).await? {
        Some(reading) => {
            info!(
                "{}: {}°C (feels like {}°C), humidity {:.0}%, pressure {:.0} hPa, wind {} m/s",
                city,
                reading.temp_c,
                reading.feels_like_c,
                reading.humidity,
                reading.pressure,
                reading.wind_speed
            );
        }
        None => {
            error!("City '{}' not found", city);
            std::process::exit(1);
        }
    }

    match api.fetch_forecast(&city).await? {
        Some(points) => {
            info!("Next 24 hours:");
            for point in points.iter().take(8) {
                info!("  {:02}:00 - {}°C", point.hour, point.temp_c);
            }
        }
        None => {
            error!("Forecast unavailable for '{}'", city);
        }
    }

    Ok(())
}
