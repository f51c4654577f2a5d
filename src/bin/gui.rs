#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    hwpdf::gui::launch()
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("GUI feature is not enabled. Please build with --features gui");
    std::process::exit(1);
}
