//! Offscreen board compositor and PNG export.
//!
//! `render_board` flattens the whole session into an `RgbaImage` in the same
//! stacking order the canvas paints — ground, zones, doodles, artwork,
//! captions, pins, decorations, carried entity last — so the saved file
//! matches the screen. Caption and zone-number text is rasterized from the
//! 8×8 bitmap font; decorations go through an inverse-mapped rotated blit.

use crate::assets::Gallery;
use crate::board::{Decoration, DecorationKind, DragSession, DragTarget, Item, Session};
use crate::theme;
use chrono::Local;
use egui::{Color32, Pos2, Rect, Vec2};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Error type for export operations.
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Encode(image::ImageError),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Encode(e) => write!(f, "PNG encode error: {}", e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Encode(e)
    }
}

/// Timestamped default file name for the save dialog.
pub fn suggested_file_name() -> String {
    format!("moodboard_{}.png", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Write the composite to disk as RGBA PNG.
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut writer);
    #[allow(deprecated)]
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

/// Flatten the session into a bitmap at the board's own size.
pub fn render_board(session: &Session, gallery: &Gallery) -> RgbaImage {
    let size = session.board_rect().size();
    let w = size.x.round().max(1.0) as u32;
    let h = size.y.round().max(1.0) as u32;
    let mut img = RgbaImage::from_pixel(w, h, to_rgba(theme::BOARD_BACKGROUND));

    for zone in &session.zones {
        let fill = zone.fill.unwrap_or(theme::ZONE_EMPTY_FILL);
        fill_rect(&mut img, zone.rect, to_rgba(fill));
        stroke_rect(&mut img, zone.rect, 2.0, to_rgba(theme::ZONE_OUTLINE));
        let label = (zone.id + 1).to_string();
        let scale = 3;
        draw_bitmap_text(
            &mut img,
            zone.rect.center().x as i64 - text_width(&label, scale) / 2,
            zone.rect.center().y as i64 - 4 * scale,
            &label,
            to_rgba(theme::ZONE_NUMBER),
            scale,
        );
    }

    for dot in &session.doodles {
        fill_circle(&mut img, dot.pos, dot.radius, to_rgba(theme::DOODLE_INK));
    }

    let carried = session.dragged_item();
    for item in &session.items {
        if carried == Some(item.id) {
            continue;
        }
        draw_item(&mut img, item, gallery);
    }

    for item in &session.items {
        if item.pinned && carried != Some(item.id) {
            draw_pin(&mut img, item, gallery);
        }
    }

    for piece in &session.decorations {
        draw_decoration(&mut img, piece, gallery);
    }

    // The carried entity rides on top of everything, as on screen.
    if let Some(DragSession { target, .. }) = &session.drag {
        match target {
            DragTarget::Item(id) => {
                if let Some(item) = session.items.get(*id) {
                    draw_item(&mut img, item, gallery);
                }
            }
            DragTarget::NewDecoration(piece) => draw_decoration(&mut img, piece, gallery),
        }
    }

    img
}

fn draw_decoration(img: &mut RgbaImage, piece: &Decoration, gallery: &Gallery) {
    let sprite = match piece.kind {
        DecorationKind::Tape => gallery.tape(),
        DecorationKind::Frame => gallery.frame(),
    };
    blit_rotated(img, sprite, piece.rect(), piece.rotation_deg);
}

fn draw_item(img: &mut RgbaImage, item: &Item, gallery: &Gallery) {
    if let Some(art) = gallery.artworks().get(item.artwork) {
        blit_scaled(img, art, item.rect());
    }
    if let Some(name) = &item.display_name {
        let caption = gallery.metadata_for(item.artwork).caption(name);
        let rect = item.rect();
        let mut y = (rect.max.y + theme::CAPTION_GAP) as i64;
        for line in caption.lines() {
            draw_bitmap_text(
                img,
                rect.center().x as i64 - text_width(line, 1) / 2,
                y,
                line,
                to_rgba(theme::CAPTION_TEXT),
                1,
            );
            y += 11;
        }
    }
}

fn draw_pin(img: &mut RgbaImage, item: &Item, gallery: &Gallery) {
    let rect = item.rect();
    let pin_rect = Rect::from_center_size(
        Pos2::new(rect.center().x, rect.min.y),
        Vec2::splat(item.size.x * theme::PIN_SIZE_FRACTION),
    );
    blit_scaled(img, gallery.pin(), pin_rect);
}

// ============================================================================
// PIXEL HELPERS
// ============================================================================

fn to_rgba(c: Color32) -> Rgba<u8> {
    Rgba([c.r(), c.g(), c.b(), c.a()])
}

/// Integer pixel bounds of a rect, clipped to the image.
fn bounds(img: &RgbaImage, rect: Rect) -> (i64, i64, i64, i64) {
    (
        rect.min.x.floor().max(0.0) as i64,
        rect.min.y.floor().max(0.0) as i64,
        (rect.max.x.ceil() as i64).min(img.width() as i64),
        (rect.max.y.ceil() as i64).min(img.height() as i64),
    )
}

/// Source-over blend of one pixel; out-of-bounds writes are dropped.
fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let a = color[3] as u32;
    if a == 0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    if a == 255 {
        *dst = color;
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        dst[c] = ((color[c] as u32 * a + dst[c] as u32 * inv) / 255) as u8;
    }
    dst[3] = (a + dst[3] as u32 * inv / 255).min(255) as u8;
}

fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (x0, y0, x1, y1) = bounds(img, rect);
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(img, x, y, color);
        }
    }
}

fn stroke_rect(img: &mut RgbaImage, rect: Rect, width: f32, color: Rgba<u8>) {
    let w = width.max(1.0);
    fill_rect(img, Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.min.y + w)), color);
    fill_rect(img, Rect::from_min_max(Pos2::new(rect.min.x, rect.max.y - w), rect.max), color);
    fill_rect(img, Rect::from_min_max(rect.min, Pos2::new(rect.min.x + w, rect.max.y)), color);
    fill_rect(img, Rect::from_min_max(Pos2::new(rect.max.x - w, rect.min.y), rect.max), color);
}

fn fill_circle(img: &mut RgbaImage, center: Pos2, radius: f32, color: Rgba<u8>) {
    let bbox = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
    let (x0, y0, x1, y1) = bounds(img, bbox);
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if (dx * dx + dy * dy).sqrt() <= radius {
                blend_pixel(img, x, y, color);
            }
        }
    }
}

/// Alpha-aware scaled blit of a sprite into the destination rect.
fn blit_scaled(img: &mut RgbaImage, sprite: &RgbaImage, rect: Rect) {
    let w = rect.width().round().max(1.0) as u32;
    let h = rect.height().round().max(1.0) as u32;
    let scaled = imageops::resize(sprite, w, h, FilterType::Triangle);
    imageops::overlay(img, &scaled, rect.min.x.round() as i64, rect.min.y.round() as i64);
}

/// Rotated blit: walks the rotated footprint's bounding box and maps every
/// destination pixel back into sprite space (nearest sample).
fn blit_rotated(img: &mut RgbaImage, sprite: &RgbaImage, rect: Rect, rotation_deg: f32) {
    if rotation_deg == 0.0 {
        blit_scaled(img, sprite, rect);
        return;
    }
    let center = rect.center();
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let half = rect.size() * 0.5;
    let ext = Vec2::new(
        half.x * cos.abs() + half.y * sin.abs(),
        half.x * sin.abs() + half.y * cos.abs(),
    );
    let (x0, y0, x1, y1) = bounds(img, Rect::from_center_size(center, ext * 2.0));
    let sx = sprite.width() as f32 / rect.width();
    let sy = sprite.height() as f32 / rect.height();
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            let ux = cos * dx + sin * dy + half.x;
            let uy = -sin * dx + cos * dy + half.y;
            if ux < 0.0 || uy < 0.0 || ux >= rect.width() || uy >= rect.height() {
                continue;
            }
            let px = sprite.get_pixel(
                ((ux * sx) as u32).min(sprite.width() - 1),
                ((uy * sy) as u32).min(sprite.height() - 1),
            );
            blend_pixel(img, x, y, *px);
        }
    }
}

fn text_width(text: &str, scale: i64) -> i64 {
    text.chars().count() as i64 * 8 * scale
}

/// Rasterize a line with the 8×8 bitmap font. Glyph rows are little-endian
/// bitmasks; characters outside the basic set advance without drawing.
fn draw_bitmap_text(img: &mut RgbaImage, x: i64, y: i64, text: &str, color: Rgba<u8>, scale: i64) {
    let mut cx = x;
    for ch in text.chars() {
        if let Some(glyph) = BASIC_FONTS.get(ch) {
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..8 {
                    if bits & (1 << col) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                blend_pixel(
                                    img,
                                    cx + col as i64 * scale + sx,
                                    y + row as i64 * scale + sy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
        }
        cx += 8 * scale;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: Vec2 = Vec2::new(800.0, 600.0);

    fn session(items: usize) -> Session {
        let mut s = Session::new(11);
        s.initialize(BOARD, 4, items);
        s
    }

    #[test]
    fn composite_matches_the_board_size() {
        let img = render_board(&session(5), &Gallery::new());
        assert_eq!(img.dimensions(), (800, 600));
    }

    #[test]
    fn ground_color_shows_outside_the_grid() {
        let img = render_board(&session(0), &Gallery::new());
        assert_eq!(*img.get_pixel(797, 3), to_rgba(theme::BOARD_BACKGROUND));
    }

    #[test]
    fn painted_zone_fill_reaches_the_pixels() {
        let mut s = session(0);
        let color = theme::PAINT_PALETTE[2];
        s.zones[0].fill = Some(color);
        let img = render_board(&s, &Gallery::new());
        let c = s.zones[0].rect.center();
        assert_eq!(*img.get_pixel(c.x as u32, c.y as u32), to_rgba(color));
    }

    #[test]
    fn zone_numbers_are_stamped_into_empty_zones() {
        let s = session(0);
        let img = render_board(&s, &Gallery::new());
        let rect = s.zones[4].rect.shrink(4.0);
        let (x0, y0, x1, y1) = bounds(&img, rect);
        let empty = to_rgba(theme::ZONE_EMPTY_FILL);
        let found = (y0..y1).any(|y| (x0..x1).any(|x| *img.get_pixel(x as u32, y as u32) != empty));
        assert!(found, "expected number glyph pixels inside the zone");
    }

    #[test]
    fn doodle_dots_are_inked() {
        let mut s = session(0);
        s.doodle_at(Pos2::new(400.0, 500.0));
        let img = render_board(&s, &Gallery::new());
        assert_eq!(*img.get_pixel(400, 500), to_rgba(theme::DOODLE_INK));
    }

    #[test]
    fn artwork_covers_its_zone_center() {
        let s = session(1);
        let zone = s.items[0].zone.unwrap();
        let img = render_board(&s, &Gallery::new());
        let c = s.zones[zone].rect.center();
        assert_ne!(*img.get_pixel(c.x as u32, c.y as u32), to_rgba(theme::ZONE_EMPTY_FILL));
    }

    #[test]
    fn caption_text_appears_below_a_named_item() {
        let mut s = session(1);
        s.apply_name(0, "Dawn".to_string());
        let img = render_board(&s, &Gallery::new());
        let rect = s.items[0].rect();
        let band = Rect::from_min_max(
            Pos2::new(rect.min.x - 100.0, rect.max.y),
            Pos2::new(rect.max.x + 100.0, rect.max.y + 32.0),
        );
        let (x0, y0, x1, y1) = bounds(&img, band);
        let ink = to_rgba(theme::CAPTION_TEXT);
        let found = (y0..y1).any(|y| (x0..x1).any(|x| *img.get_pixel(x as u32, y as u32) == ink));
        assert!(found, "expected caption pixels under the item");
    }

    #[test]
    fn unnamed_items_have_no_caption() {
        let s = session(1);
        let img = render_board(&s, &Gallery::new());
        let rect = s.items[0].rect();
        let band = Rect::from_min_max(
            Pos2::new(rect.min.x - 100.0, rect.max.y + 2.0),
            Pos2::new(rect.max.x + 100.0, rect.max.y + 32.0),
        );
        let (x0, y0, x1, y1) = bounds(&img, band);
        let ink = to_rgba(theme::CAPTION_TEXT);
        let found = (y0..y1).any(|y| (x0..x1).any(|x| *img.get_pixel(x as u32, y as u32) == ink));
        assert!(!found);
    }

    #[test]
    fn rotated_tape_still_covers_its_center() {
        let mut s = session(0);
        let spot = Pos2::new(400.0, 500.0);
        s.begin_decoration_drag(DecorationKind::Tape, spot);
        s.end_drag(spot);
        s.toggle_mode(crate::board::InteractionMode::Rotate);
        s.rotate_decoration_at(spot);
        assert_eq!(s.decorations[0].rotation_deg, 45.0);
        let img = render_board(&s, &Gallery::new());
        assert_ne!(*img.get_pixel(400, 500), to_rgba(theme::BOARD_BACKGROUND));
    }

    #[test]
    fn png_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        let img = render_board(&session(3), &Gallery::new());
        write_png(&path, &img).unwrap();
        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.dimensions(), img.dimensions());
        assert_eq!(loaded.get_pixel(797, 3), img.get_pixel(797, 3));
    }

    #[test]
    fn suggested_name_is_timestamped_png() {
        let name = suggested_file_name();
        assert!(name.starts_with("moodboard_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "moodboard_".len() + 15 + ".png".len());
    }
}
