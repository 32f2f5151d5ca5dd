extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use visualcrossing::VisualCrossingApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let (city, start, end, frequency) = if args.len() >= 5 {
        (
            args[1].clone(),
            args[2].clone(),
            args[3].clone(),
            args[4].clone(),
        )
    } else {
        info!("Usage: {} <city> <start> <end> <frequency>", args[0]);
        info!("Using defaults (Moscow 2024-12-16..2024-12-17, 3h)...");
        (
            "Moscow".to_string(),
            "2024-12-16".to_string(),
            "2024-12-17".to_string(),
            "3h".to_string(),
        )
    };

    let api = VisualCrossingApi::new()?;

    match api
        .fetch_average_series(&city, &start, &end, &frequency)
        .await?
    {
        Some(records) if !records.is_empty() => {
            info!("Retrieved {} records for {}", records.len(), city);
            for record in &records {
                info!(
                    "  {} - {:.1}°, {:.1} pressure, {:.0}% humidity, {:.1} wind",
                    record.timestamp,
                    record.temperature,
                    record.pressure,
                    record.humidity,
                    record.windspeed
                );
            }
        }
        _ => {
            error!("No data for {} in {}..{}", city, start, end);
            std::process::exit(1);
        }
    }

    Ok(())
}
