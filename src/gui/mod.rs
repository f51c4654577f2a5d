//! Drag-and-drop graphical converter built on eframe.
//!
//! The window only selects files and shows progress; conversions run on a
//! background thread through `api::run_plan`, and their events come back over
//! a channel that is drained once per frame.
pub mod app;
pub mod components;
pub mod logging;
pub mod models;
pub mod processing;

use eframe::NativeOptions;
use eframe::egui::{IconData, ViewportBuilder};

pub use models::HwpdfGui;

/// Window icon: `icon.png` next to the executable, when present
fn load_icon() -> Option<IconData> {
    let path = std::env::current_exe().ok()?.parent()?.join("icon.png");
    if !path.is_file() {
        return None;
    }
    match image::open(&path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Some(IconData {
                rgba: rgba.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable icon {:?}: {}", path, e);
            None
        }
    }
}

pub fn launch() -> Result<(), eframe::Error> {
    logging::init_gui_logging();

    let mut viewport = ViewportBuilder::default()
        .with_inner_size([640.0, 520.0])
        .with_min_inner_size([540.0, 500.0])
        .with_drag_and_drop(true);
    if let Some(icon) = load_icon() {
        viewport = viewport.with_icon(icon);
    }

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "HWP/HWPX to PDF",
        options,
        Box::new(|_cc| Ok(Box::new(HwpdfGui::default()))),
    )
}
