use std::sync::Mutex;

use anyhow::Result;
use log::{error, info};
use once_cell::sync::Lazy;
use slint::ComponentHandle;

use visualcrossing::VisualCrossingApi;

use crate::app::charts::{Chart, WeatherSeries};
use crate::app::forms::{self, QueryForm, QueryParameters};
use crate::app::{notify, save};
use crate::MainWindow;

// Chart currently shown on the tab, retained for the save action
static DEVIATION_CHART: Lazy<Mutex<Option<Chart>>> = Lazy::new(|| Mutex::new(None));

// Public API called from main.rs
pub fn setup_deviation_callbacks(main_window: &MainWindow) {
    let w_plot = main_window.as_weak();
    main_window.on_deviation_requested(move |city, start_date, end_date, frequency| {
        let w = w_plot.clone();
        slint::invoke_from_event_loop(move || {
            if let Some(window) = w.upgrade() {
                let form = QueryForm {
                    city: &city,
                    start_date: &start_date,
                    end_date: &end_date,
                    frequency: &frequency,
                };
                let result = forms::submit_query(&form, |params| {
                    let rt = tokio::runtime::Runtime::new().unwrap();
                    rt.block_on(plot_deviation(&window, params))
                });
                if let Err(e) = result {
                    error!("Deviation query failed: {e}");
                    notify::show_warning(&window, &e.to_string());
                }
            }
        })
        .unwrap();
    });

    let w_save = main_window.as_weak();
    main_window.on_save_deviation_requested(move || {
        if let Some(window) = w_save.upgrade() {
            save::save_chart(&window, &DEVIATION_CHART);
        }
    });
}

async fn plot_deviation(main_window: &MainWindow, params: QueryParameters) -> Result<()> {
    let api = VisualCrossingApi::new()?;

    info!(
        "Fetching deviation series for {} {}..{} at {}",
        params.city, params.start_date, params.end_date, params.frequency
    );
    let records = api
        .fetch_deviation_series(
            &params.city,
            &params.start_date,
            &params.end_date,
            &params.frequency,
        )
        .await?;

    let records = match records {
        Some(records) if !records.is_empty() => records,
        _ => {
            notify::show_info(main_window, "No data to display.");
            return Ok(());
        }
    };
    info!("Plotting {} records", records.len());

    let chart = Chart::Deviation(WeatherSeries::from_records(&records));
    main_window.set_deviation_chart(chart.to_image()?);
    main_window.set_deviation_chart_visible(true);
    *DEVIATION_CHART.lock().unwrap() = Some(chart);

    Ok(())
}
