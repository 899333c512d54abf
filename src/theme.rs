//! Visual constants for the board and its chrome.
//!
//! The board palette comes from the clay-and-ink look of the original
//! sketches: a warm terracotta ground with hot-pink ink on top. Everything
//! that draws — the live canvas and the export compositor — pulls its colors
//! from here so the saved PNG matches the screen.

use egui::Color32;

/// Terracotta board ground.
pub const BOARD_BACKGROUND: Color32 = Color32::from_rgb(150, 50, 10);

/// Ink color for doodle dots.
pub const DOODLE_INK: Color32 = Color32::from_rgb(255, 40, 100);

/// Fill colors the paint bucket draws from. Picks are uniform; repeats are
/// allowed on consecutive clicks.
pub const PAINT_PALETTE: [Color32; 6] = [
    Color32::from_rgb(244, 208, 111), // ochre
    Color32::from_rgb(143, 188, 187), // sage
    Color32::from_rgb(129, 161, 193), // slate blue
    Color32::from_rgb(191, 97, 106),  // brick
    Color32::from_rgb(180, 142, 173), // mauve
    Color32::from_rgb(235, 203, 139), // sand
];

/// Resting tint of an unpainted zone, a shade darker than the ground so the
/// wells read as recesses.
pub const ZONE_EMPTY_FILL: Color32 = Color32::from_rgb(128, 42, 8);

/// Zone border.
pub const ZONE_OUTLINE: Color32 = Color32::from_rgb(92, 30, 6);

/// The big 1-based zone number painted behind placed artwork.
pub const ZONE_NUMBER: Color32 = Color32::from_rgba_premultiplied(255, 236, 214, 90);

/// Caption text beneath a named artwork.
pub const CAPTION_TEXT: Color32 = Color32::from_rgb(255, 241, 224);

/// Drop shadow behind items while they are carried.
pub const DRAG_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 60);

/// Fill of the panel area around the board.
pub const APP_BACKGROUND: Color32 = Color32::from_rgb(34, 30, 28);

/// Accent for toolbar hints and separators.
pub const TOOLBAR_HINT: Color32 = Color32::from_rgb(170, 160, 150);

/// Point sizes for on-screen text.
pub const ZONE_NUMBER_FONT: f32 = 30.0;
pub const CAPTION_FONT: f32 = 13.0;

/// Pin head size as a fraction of the item width. Shared by the canvas and
/// the export compositor so both render the same pin.
pub const PIN_SIZE_FRACTION: f32 = 0.24;

/// Vertical gap between an item and its caption, in board units.
pub const CAPTION_GAP: f32 = 6.0;
