use std::sync::Mutex;

use log::error;

use crate::app::charts::Chart;
use crate::app::notify;
use crate::MainWindow;

/// Ask the user for a target path and export the tab's most recent chart.
/// Cancelling the dialog does nothing; an existing file is overwritten
/// silently, which is the dialog's default.
pub fn save_chart(main_window: &MainWindow, slot: &Mutex<Option<Chart>>) {
    let guard = slot.lock().unwrap();
    let chart = match guard.as_ref() {
        Some(chart) => chart,
        None => {
            notify::show_info(main_window, "Nothing to save yet.");
            return;
        }
    };

    let path = rfd::FileDialog::new()
        .add_filter("PNG files", &["png"])
        .add_filter("JPEG files", &["jpg", "jpeg"])
        .set_file_name("chart.png")
        .save_file();

    if let Some(path) = path {
        if let Err(e) = chart.save(&path) {
            error!("Failed to save chart to {}: {}", path.display(), e);
            notify::show_error(main_window, &format!("Failed to save chart: {}", e));
        }
    }
}
