use eframe::egui::{self, Align, Align2, Color32, Layout, ProgressBar, RichText, ScrollArea, Ui};
use tracing::Level;

use super::logging::LogEntry;
use super::models::{HwpdfGui, RunSummary};
use super::processing::OverwriteChoice;
use crate::types::display_name;

const START_COLOR: Color32 = Color32::from_rgb(76, 175, 80);
const STOP_COLOR: Color32 = Color32::from_rgb(244, 67, 54);
const OPEN_COLOR: Color32 = Color32::from_rgb(33, 150, 243);

fn action_button(label: &str, fill: Color32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label.to_string()).size(15.0).color(Color32::WHITE))
        .fill(fill)
        .min_size(egui::vec2(120.0, 32.0))
}

fn format_log_entry(entry: &LogEntry) -> RichText {
    let color = match entry.level {
        Level::ERROR => Color32::from_rgb(255, 100, 100),
        Level::WARN => Color32::from_rgb(255, 200, 100),
        _ if entry.message.contains("Failed:") => Color32::from_rgb(255, 140, 120),
        _ if entry.message.starts_with("(cancelled)") => Color32::from_rgb(255, 165, 0),
        _ => Color32::from_gray(220),
    };
    RichText::new(format!("[{}] {}", entry.timestamp, entry.message))
        .color(color)
        .monospace()
}

pub struct ToolbarComponent;

impl ToolbarComponent {
    pub fn render(ui: &mut Ui, app: &mut HwpdfGui) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(app.can_select(), action_button("Open files", OPEN_COLOR))
                .clicked()
            {
                app.open_files();
            }

            if ui
                .add_enabled(app.can_start(), action_button("Start", START_COLOR))
                .clicked()
            {
                app.start_conversion(ui.ctx());
            }

            let can_stop = app.is_processing && !app.stop_requested;
            if ui
                .add_enabled(can_stop, action_button("Stop", STOP_COLOR))
                .clicked()
            {
                app.stop_conversion();
            }
        });
    }
}

pub struct SelectionComponent;

impl SelectionComponent {
    pub fn render(ui: &mut Ui, app: &HwpdfGui) {
        ui.label(RichText::new(&app.info_message).size(14.0));
        if app.selected_files.is_empty() {
            return;
        }
        egui::CollapsingHeader::new(format!("Selected files ({})", app.selected_files.len()))
            .default_open(false)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("selected_files")
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for file in &app.selected_files {
                            ui.label(RichText::new(display_name(file)).color(Color32::from_gray(180)))
                                .on_hover_text(file.display().to_string());
                        }
                    });
            });
    }
}

pub struct SettingsComponent;

impl SettingsComponent {
    pub fn render(ui: &mut Ui, app: &mut HwpdfGui) {
        ui.add_enabled_ui(!app.is_processing, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut app.params.overwrite, "Overwrite existing PDFs without asking");
            });
            ui.horizontal(|ui| {
                ui.label("LibreOffice:");
                ui.add(
                    egui::TextEdit::singleline(&mut app.engine_path)
                        .hint_text("soffice (from PATH)")
                        .desired_width(260.0),
                );
                if ui.button("Browse").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_file() {
                        app.engine_path = path.display().to_string();
                    }
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Save settings").clicked() {
                    match app.save_preset() {
                        Ok(path) => tracing::info!("Settings saved to: {:?}", path),
                        Err(e) => tracing::warn!("Settings not saved: {}", e),
                    }
                }
                if ui.button("Load settings").clicked() {
                    match app.load_preset() {
                        Ok(path) => tracing::info!("Settings loaded from: {:?}", path),
                        Err(e) => tracing::warn!("Settings not loaded: {}", e),
                    }
                }
            });
        });
    }
}

pub struct ProgressComponent;

impl ProgressComponent {
    pub fn render(ui: &mut Ui, app: &HwpdfGui) {
        let bar = ProgressBar::new(f32::from(app.progress) / 100.0)
            .show_percentage()
            .fill(START_COLOR);
        ui.add(bar);
    }
}

pub struct LogPanelComponent;

impl LogPanelComponent {
    pub fn render(ui: &mut Ui, app: &mut HwpdfGui) {
        ui.horizontal(|ui| {
            ui.label("Log");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui
                    .add_enabled(!app.log_messages.is_empty(), egui::Button::new("Save log"))
                    .clicked()
                {
                    if let Err(e) = app.save_logs_to_file() {
                        tracing::warn!("Log not saved: {}", e);
                    }
                }
            });
        });

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ScrollArea::vertical()
                .id_salt("log_panel")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if app.log_messages.is_empty() {
                        ui.label(RichText::new("No log messages").color(Color32::from_gray(120)));
                    }
                    for entry in &app.log_messages {
                        ui.label(format_log_entry(entry));
                    }
                });
        });
    }
}

pub struct OverwritePrompt;

impl OverwritePrompt {
    pub fn render(ctx: &egui::Context, app: &mut HwpdfGui) {
        let Some(duplicates) = &app.pending_duplicates else {
            return;
        };
        let names: Vec<String> = duplicates.iter().map(|p| display_name(p)).collect();

        let mut choice = None;
        egui::Window::new("PDF already exists")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("A PDF already exists for the following files:");
                ScrollArea::vertical()
                    .id_salt("duplicates")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for name in &names {
                            ui.label(RichText::new(name).monospace());
                        }
                    });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Overwrite all").clicked() {
                        choice = Some(OverwriteChoice::OverwriteAll);
                    }
                    if ui.button("Skip").clicked() {
                        choice = Some(OverwriteChoice::Skip);
                    }
                    if ui.button("Cancel").clicked() {
                        choice = Some(OverwriteChoice::Cancel);
                    }
                });
            });

        if let Some(choice) = choice {
            app.resolve_duplicates(choice, ctx);
        }
    }
}

pub struct WarningDialog;

impl WarningDialog {
    pub fn render(ctx: &egui::Context, app: &mut HwpdfGui) {
        let Some(message) = app.warning.clone() else {
            return;
        };
        egui::Window::new("Warning")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    app.warning = None;
                }
            });
    }
}

pub struct FooterComponent;

impl FooterComponent {
    pub fn render(ui: &mut Ui, app: &HwpdfGui) {
        ui.horizontal(|ui| {
            let status_color = match (&app.last_summary, app.is_processing) {
                (_, true) => Color32::from_rgb(255, 165, 0),
                (Some(RunSummary::EngineError(_)), _) => Color32::from_rgb(255, 100, 100),
                (Some(RunSummary::Completed { failed, .. }), _) if *failed > 0 => {
                    Color32::from_rgb(255, 200, 100)
                }
                _ => Color32::from_rgb(100, 200, 100),
            };
            ui.label(RichText::new(app.status_text()).color(status_color).size(13.0));

            if app.is_processing || app.last_summary.is_some() {
                ui.separator();
                ui.label(
                    RichText::new(format!("Converted: {}  Failed: {}", app.succeeded, app.failed))
                        .size(12.0),
                );
            }
        });
    }
}
