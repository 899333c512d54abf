use eframe::egui;
use egui::{ColorImage, TextureHandle, TextureOptions};
use image::RgbaImage;

// ============================================================================
// NAMING DIALOG
// ============================================================================

/// How a raw naming submission resolves once trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameSubmission {
    Submitted(String),
    Cancelled,
}

/// Classify the draft text: whitespace-only input is a cancellation, never
/// an empty name.
pub fn classify_name(raw: &str) -> NameSubmission {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NameSubmission::Cancelled
    } else {
        NameSubmission::Submitted(trimmed.to_string())
    }
}

/// First-placement naming prompt. A dismissed prompt stores nothing, so the
/// next placement of the same artwork asks again.
pub struct NamingDialog {
    pub open: bool,
    item: usize,
    draft: String,
    just_opened: bool,
}

impl Default for NamingDialog {
    fn default() -> Self {
        Self {
            open: false,
            item: 0,
            draft: String::new(),
            just_opened: false,
        }
    }
}

impl NamingDialog {
    /// Arm the prompt for one item with a blank draft.
    pub fn open_for(&mut self, item: usize) {
        self.open = true;
        self.item = item;
        self.draft.clear();
        self.just_opened = true;
    }

    /// Show the dialog and return `(item, name)` when a usable name was
    /// submitted. Keyboard: Enter = submit, Esc = skip.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<(usize, String)> {
        if !self.open {
            return None;
        }

        let mut submit = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));
        let mut should_close = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));

        egui::Window::new("naming_dialog")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.label(egui::RichText::new("Name this artwork").strong());
                ui.add_space(6.0);
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut self.draft)
                        .hint_text("e.g. Dawn")
                        .desired_width(f32::INFINITY),
                );
                if self.just_opened {
                    edit.request_focus();
                    self.just_opened = false;
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Name it").clicked() {
                        submit = true;
                    }
                    if ui.button("Skip").clicked() {
                        should_close = true;
                    }
                });
            });

        let mut result = None;
        if submit {
            if let NameSubmission::Submitted(name) = classify_name(&self.draft) {
                result = Some((self.item, name));
            }
            // An empty submit is a cancellation and just closes.
            should_close = true;
        }
        if should_close {
            self.open = false;
        }
        result
    }
}

// ============================================================================
// EXPORT PREVIEW DIALOG
// ============================================================================

/// Action chosen on the export preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportAction {
    /// Save the capture through the native file dialog.
    Save,
    /// Throw the board away and deal a fresh session.
    Restart,
}

/// Holds the captured board bitmap and shows it until the user saves,
/// restarts, or goes back.
pub struct ExportDialog {
    pub open: bool,
    capture: Option<RgbaImage>,
    preview: Option<TextureHandle>,
}

impl Default for ExportDialog {
    fn default() -> Self {
        Self {
            open: false,
            capture: None,
            preview: None,
        }
    }
}

impl ExportDialog {
    pub fn open_with(&mut self, capture: RgbaImage) {
        self.open = true;
        self.capture = Some(capture);
        // Upload lazily on the next show so we have a context.
        self.preview = None;
    }

    pub fn capture(&self) -> Option<&RgbaImage> {
        self.capture.as_ref()
    }

    pub fn close(&mut self) {
        self.open = false;
        self.capture = None;
        self.preview = None;
    }

    /// Show the preview window. Keyboard: Enter = save, Esc = back.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ExportAction> {
        if !self.open {
            return None;
        }

        let mut action = None;
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)) {
            action = Some(ExportAction::Save);
        }
        let mut should_close = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));

        if self.preview.is_none()
            && let Some(img) = &self.capture
        {
            let color = ColorImage::from_rgba_unmultiplied(
                [img.width() as usize, img.height() as usize],
                img.as_raw(),
            );
            self.preview = Some(ctx.load_texture("export_preview", color, TextureOptions::LINEAR));
        }

        egui::Window::new("export_dialog")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Board capture").strong());
                ui.add_space(6.0);
                if let Some(tex) = &self.preview {
                    let size = tex.size_vec2();
                    let scale = (480.0 / size.x).min(340.0 / size.y).min(1.0);
                    let sized = egui::load::SizedTexture::from_handle(tex);
                    ui.add(egui::Image::from_texture(sized).fit_to_exact_size(size * scale));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save PNG…").clicked() {
                        action = Some(ExportAction::Save);
                    }
                    if ui.button("Restart").clicked() {
                        action = Some(ExportAction::Restart);
                    }
                    if ui.button("Back").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            self.close();
        }
        action
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_names_are_cancellations() {
        assert_eq!(classify_name(""), NameSubmission::Cancelled);
        assert_eq!(classify_name("   "), NameSubmission::Cancelled);
        assert_eq!(classify_name("\t\n"), NameSubmission::Cancelled);
    }

    #[test]
    fn names_are_trimmed_on_submit() {
        assert_eq!(
            classify_name("  Dawn "),
            NameSubmission::Submitted("Dawn".to_string())
        );
        assert_eq!(
            classify_name("Quiet Harbor"),
            NameSubmission::Submitted("Quiet Harbor".to_string())
        );
    }

    #[test]
    fn interior_whitespace_survives_the_trim() {
        assert_eq!(
            classify_name(" a  b "),
            NameSubmission::Submitted("a  b".to_string())
        );
    }
}
