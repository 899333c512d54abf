//! Application shell: owns the session and routes toolbar actions, canvas
//! outcomes, and dialog results between the pieces.

use crate::assets::Gallery;
use crate::board::{PlacementOutcome, Session};
use crate::canvas::BoardCanvas;
use crate::components::dialogs::{ExportAction, ExportDialog, NamingDialog};
use crate::components::toolbar::{ToolbarEvent, ToolbarPanel};
use crate::{export, theme};
use eframe::egui;

pub struct MoodFEApp {
    session: Session,
    gallery: Gallery,
    canvas: BoardCanvas,
    toolbar: ToolbarPanel,
    naming_dialog: NamingDialog,
    export_dialog: ExportDialog,
}

impl MoodFEApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let seed: u64 = rand::random();
        let session = Session::new(seed);
        crate::log_info!("session {} started (seed {:#018x})", session.id, seed);
        Self {
            session,
            gallery: Gallery::new(),
            canvas: BoardCanvas::default(),
            toolbar: ToolbarPanel::default(),
            naming_dialog: NamingDialog::default(),
            export_dialog: ExportDialog::default(),
        }
    }

    /// Throw the whole board away and deal a fresh one. The new session lays
    /// out its grid on the next frame the canvas shows it.
    fn restart(&mut self) {
        let seed: u64 = rand::random();
        self.session = Session::new(seed);
        crate::log_info!("restart: session {} (seed {:#018x})", self.session.id, seed);
    }

    fn handle_toolbar(&mut self, ctx: &egui::Context, event: ToolbarEvent) {
        match event {
            ToolbarEvent::ModeToggled(mode) => {
                self.session.toggle_mode(mode);
                crate::log_info!("mode: {}", self.session.mode.label());
            }
            ToolbarEvent::TemplateDragged(kind) => {
                if let Some(p) = ctx.input(|i| i.pointer.interact_pos()) {
                    self.session.begin_decoration_drag(kind, self.canvas.to_board(p));
                }
            }
            ToolbarEvent::ExportRequested => {
                if !self.session.is_initialized() {
                    return;
                }
                let capture = export::render_board(&self.session, &self.gallery);
                crate::log_info!("captured board ({}x{})", capture.width(), capture.height());
                self.export_dialog.open_with(capture);
            }
            ToolbarEvent::RestartRequested => self.restart(),
        }
    }

    /// Run the native save dialog and write the captured PNG. Failures are
    /// logged and the preview stays open; cancelling the dialog keeps it too.
    fn save_capture(&mut self) {
        let mut saved = false;
        if let Some(capture) = self.export_dialog.capture() {
            let picked = rfd::FileDialog::new()
                .set_title("Save moodboard")
                .set_file_name(&export::suggested_file_name())
                .add_filter("PNG image", &["png"])
                .save_file();
            if let Some(path) = picked {
                match export::write_png(&path, capture) {
                    Ok(()) => {
                        crate::log_info!("saved board to {}", path.display());
                        saved = true;
                    }
                    Err(e) => crate::log_err!("export failed: {}", e),
                }
            }
        }
        if saved {
            self.export_dialog.close();
        }
    }
}

impl eframe::App for MoodFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut toolbar_event = None;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar_event = self.toolbar.show(ui, self.session.mode);
        });
        if let Some(event) = toolbar_event {
            self.handle_toolbar(ctx, event);
        }

        let mut outcome = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::APP_BACKGROUND).inner_margin(12.0))
            .show(ctx, |ui| {
                outcome = self.canvas.show(ui, &mut self.session, &self.gallery);
            });

        if let Some(PlacementOutcome::Placed { item, zone, evicted, first_naming }) = outcome {
            crate::log_info!("item {} placed in zone {}", item, zone + 1);
            if let Some(evicted) = evicted {
                crate::log_info!("item {} bumped to the overflow spot", evicted);
            }
            if first_naming {
                self.naming_dialog.open_for(item);
            }
        }

        if let Some((item, name)) = self.naming_dialog.show(ctx) {
            crate::log_info!("item {} named {:?}", item, name);
            self.session.apply_name(item, name);
        }

        match self.export_dialog.show(ctx) {
            Some(ExportAction::Save) => self.save_capture(),
            Some(ExportAction::Restart) => {
                self.export_dialog.close();
                self.restart();
            }
            None => {}
        }
    }
}
