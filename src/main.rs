// GUI-subsystem binary on Windows: no console window is ever allocated.
#![windows_subsystem = "windows"]

use eframe::egui;
use moodfe::app::MoodFEApp;
use moodfe::logger;

fn main() -> Result<(), eframe::Error> {
    // Session log (overwrites the previous session's file).
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("MoodFE"),
        ..Default::default()
    };

    eframe::run_native("MoodFE", options, Box::new(|cc| Box::new(MoodFEApp::new(cc))))
}
