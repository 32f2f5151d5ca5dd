use slint::ComponentHandle;

use crate::MainWindow;

/// Informational notice, e.g. a well-formed query that matched no data.
pub fn show_info(main_window: &MainWindow, message: &str) {
    show(main_window, "Info", message);
}

/// Input-validation notice; the query was never sent.
pub fn show_warning(main_window: &MainWindow, message: &str) {
    show(main_window, "Warning", message);
}

/// Remote-failure notice; nothing is retried.
pub fn show_error(main_window: &MainWindow, message: &str) {
    show(main_window, "Error", message);
}

fn show(main_window: &MainWindow, title: &str, message: &str) {
    main_window.set_notice_title(title.into());
    main_window.set_notice_text(message.into());
    main_window.set_notice_visible(true);
}

pub fn setup_notice_callbacks(main_window: &MainWindow) {
    let weak = main_window.as_weak();
    main_window.on_notice_dismissed(move || {
        if let Some(window) = weak.upgrade() {
            window.set_notice_visible(false);
        }
    });
}
