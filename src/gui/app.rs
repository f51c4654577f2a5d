use std::path::PathBuf;

use eframe::egui;

use super::components::*;
use super::logging::{get_log_buffer, push_bounded};
use super::models::HwpdfGui;

impl HwpdfGui {
    fn take_dropped_files(ctx: &egui::Context) -> Vec<PathBuf> {
        ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        })
    }

    fn paint_drop_overlay(&self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if !hovering || !self.can_select() {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drop_overlay"),
        ));
        let rect = ctx.screen_rect();
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(160));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop HWP/HWPX files or folders",
            egui::FontId::proportional(22.0),
            egui::Color32::WHITE,
        );
    }

    /// Move tracing output captured by the log layer into the panel
    fn drain_tracing_buffer(&mut self) -> bool {
        let buffer = get_log_buffer();
        let Ok(mut buf) = buffer.lock() else {
            return false;
        };
        if buf.is_empty() {
            return false;
        }
        push_bounded(&mut self.log_messages, buf.drain(..));
        true
    }
}

impl eframe::App for HwpdfGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dropped = Self::take_dropped_files(ctx);
        self.handle_dropped(dropped);

        let has_events = self.poll_events();
        let has_logs = self.drain_tracing_buffer();
        if has_events || has_logs || self.is_processing {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("HWP/HWPX → PDF").size(24.0).strong());
                ui.label(
                    egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(10.0)
                        .color(egui::Color32::from_gray(150)),
                );
            });
            ui.add_space(4.0);
            ToolbarComponent::render(ui, self);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            FooterComponent::render(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            SelectionComponent::render(ui, self);
            ui.add_space(6.0);
            ProgressComponent::render(ui, self);
            ui.add_space(6.0);
            egui::CollapsingHeader::new("Settings")
                .default_open(false)
                .show(ui, |ui| SettingsComponent::render(ui, self));
            ui.separator();
            LogPanelComponent::render(ui, self);
        });

        OverwritePrompt::render(ctx, self);
        WarningDialog::render(ctx, self);
        self.paint_drop_overlay(ctx);
    }
}
