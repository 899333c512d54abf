//! Top toolbar: mode buttons, the tape/frame templates, capture and restart.

use crate::board::{DecorationKind, InteractionMode};
use crate::theme;
use eframe::egui;
use egui::{RichText, Sense};

/// What the toolbar asked for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarEvent {
    ModeToggled(InteractionMode),
    /// A drag started on a template control; the app hands the pointer to
    /// the session so the new piece is carried in the same gesture.
    TemplateDragged(DecorationKind),
    ExportRequested,
    RestartRequested,
}

#[derive(Default)]
pub struct ToolbarPanel;

impl ToolbarPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, mode: InteractionMode) -> Option<ToolbarEvent> {
        let mut event = None;
        ui.horizontal(|ui| {
            ui.label(RichText::new("MoodFE").strong().size(18.0));
            ui.separator();

            for &m in InteractionMode::all() {
                if ui.selectable_label(mode == m, m.label()).clicked() {
                    event = Some(ToolbarEvent::ModeToggled(m));
                }
            }
            ui.separator();

            // Templates are factories: dragging one spawns a piece and starts
            // carrying it. Only meaningful while arranging.
            for kind in [DecorationKind::Tape, DecorationKind::Frame] {
                let template = egui::Button::new(kind.label()).sense(Sense::click_and_drag());
                let response = ui
                    .add_enabled(mode == InteractionMode::Arrange, template)
                    .on_hover_text("drag onto the board");
                if response.drag_started() {
                    event = Some(ToolbarEvent::TemplateDragged(kind));
                }
            }
            ui.separator();

            if ui.button("Capture…").clicked() {
                event = Some(ToolbarEvent::ExportRequested);
            }
            if ui.button("Restart").clicked() {
                event = Some(ToolbarEvent::RestartRequested);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(mode.hint()).italics().color(theme::TOOLBAR_HINT));
            });
        });
        event
    }
}
