mod app;

slint::include_modules!();

extern crate pretty_env_logger;
#[macro_use] extern crate log;

fn main() -> Result<(), slint::PlatformError> {
    pretty_env_logger::init();

    info!("Starting weather charts frontend...");

    let main_window = MainWindow::new()?;

    // Set up callback handlers using the modular functions
    app::notify::setup_notice_callbacks(&main_window);
    app::current::setup_current_callbacks(&main_window);
    app::deviation::setup_deviation_callbacks(&main_window);
    app::average::setup_average_callbacks(&main_window);

    info!("Weather charts frontend started successfully");

    // Run the main window - this blocks until the window is closed
    main_window.run()
}
