//! Built-in gallery: the artwork bitmaps, the tape/frame/pin sprites, and
//! the artwork metadata catalog.
//!
//! The bitmaps are painted procedurally at startup instead of shipping image
//! files; every run produces identical pixels, so the export tests can assert
//! on exact colors. Metadata lives in an embedded JSON catalog keyed by
//! artwork slug — artworks without an entry (or a catalog that fails to
//! parse) fall back to an all-`"N/A"` record, never an error.

use image::{Rgba, RgbaImage};
use serde::Deserialize;
use std::collections::HashMap;

/// Edge length of every artwork bitmap.
pub const ARTWORK_SIZE: u32 = 128;

const TAPE_SPRITE_W: u32 = 96;
const TAPE_SPRITE_H: u32 = 26;
const FRAME_SPRITE: u32 = 128;
const FRAME_BORDER: u32 = 14;
const PIN_SPRITE: u32 = 24;

/// Gallery order; `Item::artwork` indexes into this.
const ARTWORK_SLUGS: [&str; 4] = ["dawn", "tide", "meadow", "ember"];

/// The catalog deliberately has no entry for "ember": it exercises the
/// placeholder path the same way an unknown file would.
const CATALOG_JSON: &str = r#"{
    "dawn":   { "dimensions": "5 x 5",  "medium": "pixel art", "year": "2024",
                "frame": { "path": "frames/thin_gold.png", "size": 110.0 } },
    "tide":   { "dimensions": "12 x 9", "medium": "gouache",   "year": "2021" },
    "meadow": { "dimensions": "8 x 8",  "medium": "collage",   "year": "2019",
                "frame": { "path": "frames/walnut.png", "size": 126.0 } }
}"#;

/// Frame art referenced by a catalog entry. Carried as data only; nothing
/// attaches these to placed items.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FrameRef {
    pub path: String,
    pub size: f32,
}

/// Immutable details shown in an artwork's caption.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ArtworkMeta {
    pub dimensions: String,
    pub medium: String,
    pub year: String,
    #[serde(default)]
    pub frame: Option<FrameRef>,
}

impl ArtworkMeta {
    pub fn placeholder() -> Self {
        Self {
            dimensions: "N/A".to_string(),
            medium: "N/A".to_string(),
            year: "N/A".to_string(),
            frame: None,
        }
    }

    /// Caption text: the given name on the first line, then the details in
    /// fixed order on the second.
    pub fn caption(&self, name: &str) -> String {
        format!("{}\n{}, {}, {}", name, self.dimensions, self.medium, self.year)
    }
}

/// Owns every bitmap and metadata record the app uses.
pub struct Gallery {
    artworks: Vec<RgbaImage>,
    metadata: Vec<ArtworkMeta>,
    placeholder: ArtworkMeta,
    tape: RgbaImage,
    frame: RgbaImage,
    pin: RgbaImage,
}

impl Gallery {
    pub fn new() -> Self {
        let mut catalog: HashMap<String, ArtworkMeta> = match serde_json::from_str(CATALOG_JSON) {
            Ok(map) => map,
            Err(e) => {
                crate::log_warn!("artwork catalog failed to parse: {}", e);
                HashMap::new()
            }
        };
        let placeholder = ArtworkMeta::placeholder();
        let metadata = ARTWORK_SLUGS
            .iter()
            .map(|slug| catalog.remove(*slug).unwrap_or_else(|| placeholder.clone()))
            .collect();

        Self {
            artworks: vec![paint_dawn(), paint_tide(), paint_meadow(), paint_ember()],
            metadata,
            placeholder,
            tape: paint_tape(),
            frame: paint_frame(),
            pin: paint_pin(),
        }
    }

    pub fn artwork_count(&self) -> usize {
        self.artworks.len()
    }

    pub fn artworks(&self) -> &[RgbaImage] {
        &self.artworks
    }

    /// Catalog record for an artwork, or the `"N/A"` placeholder when the
    /// artwork has no entry. Never fails.
    pub fn metadata_for(&self, artwork: usize) -> &ArtworkMeta {
        self.metadata.get(artwork).unwrap_or(&self.placeholder)
    }

    pub fn tape(&self) -> &RgbaImage {
        &self.tape
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn pin(&self) -> &RgbaImage {
        &self.pin
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PROCEDURAL PAINTERS
// ============================================================================

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |lo: u8, hi: u8| (lo as f32 + (hi as f32 - lo as f32) * t).round() as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}

/// Small integer mixer for deterministic scatter (flowers, sparks).
fn scatter_hash(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^ (x >> 16)
}

/// Sunrise over a dark ridge.
fn paint_dawn() -> RgbaImage {
    let s = ARTWORK_SIZE;
    let mut img = RgbaImage::new(s, s);
    let horizon = (s as f32 * 0.72) as u32;
    let sun = (s as f32 * 0.5, s as f32 * 0.58);
    let sun_r = s as f32 * 0.16;
    for y in 0..s {
        for x in 0..s {
            let t = y as f32 / (s - 1) as f32;
            let mut px = if y < horizon {
                lerp_rgb([60, 18, 62], [235, 120, 46], t / 0.72)
            } else {
                lerp_rgb([46, 14, 30], [74, 26, 42], (t - 0.72) / 0.28)
            };
            let dx = x as f32 - sun.0;
            let dy = y as f32 - sun.1;
            if y < horizon && (dx * dx + dy * dy).sqrt() < sun_r {
                px = Rgba([252, 216, 138, 255]);
            }
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Layered swell bands with foam crests.
fn paint_tide() -> RgbaImage {
    let s = ARTWORK_SIZE;
    let mut img = RgbaImage::new(s, s);
    for y in 0..s {
        for x in 0..s {
            let sway = (x as f32 * 0.12).sin() * 4.0;
            let fy = y as f32 + sway;
            let px = if (fy as i32).rem_euclid(16) < 2 {
                Rgba([230, 242, 240, 255])
            } else {
                lerp_rgb([10, 50, 86], [120, 190, 200], fy / s as f32)
            };
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Green field with scattered blossoms.
fn paint_meadow() -> RgbaImage {
    let s = ARTWORK_SIZE;
    let mut img = RgbaImage::new(s, s);
    for y in 0..s {
        for x in 0..s {
            let t = y as f32 / (s - 1) as f32;
            img.put_pixel(x, y, lerp_rgb([58, 110, 48], [110, 168, 64], t));
        }
    }
    for k in 0..26u32 {
        let h = scatter_hash(k.wrapping_mul(0x9e37) + 1);
        let fx = h % s;
        // Blossoms stay in the lower two thirds of the field.
        let fy = s / 3 + (h >> 9) % (2 * s / 3);
        let petal = if k % 2 == 0 { Rgba([244, 240, 236, 255]) } else { Rgba([232, 148, 176, 255]) };
        for (dx, dy) in [(0i32, 0i32), (1, 0), (0, 1), (1, 1)] {
            let px = fx.saturating_add_signed(dx).min(s - 1);
            let py = fy.saturating_add_signed(dy).min(s - 1);
            img.put_pixel(px, py, petal);
        }
    }
    img
}

/// A coal glowing out of the dark.
fn paint_ember() -> RgbaImage {
    let s = ARTWORK_SIZE;
    let mut img = RgbaImage::new(s, s);
    let c = (s - 1) as f32 * 0.5;
    for y in 0..s {
        for x in 0..s {
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
            img.put_pixel(x, y, lerp_rgb([255, 122, 30], [28, 12, 16], d / (s as f32 * 0.62)));
        }
    }
    for k in 0..14u32 {
        let h = scatter_hash(k.wrapping_mul(0x85eb) + 7);
        let sx = h % s;
        let sy = (h >> 10) % s;
        img.put_pixel(sx, sy, Rgba([255, 208, 120, 255]));
    }
    img
}

/// Masking-tape strip: translucent body, faint grain lines, torn ends.
fn paint_tape() -> RgbaImage {
    let (w, h) = (TAPE_SPRITE_W, TAPE_SPRITE_H);
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut px = if y % 7 == 3 {
                Rgba([210, 192, 120, 205])
            } else {
                Rgba([228, 212, 148, 205])
            };
            // Ragged ends: knock out a jagged pattern of edge pixels.
            if (x < 3 || x >= w - 3) && (y * 7 + x) % 3 == 0 {
                px = Rgba([0, 0, 0, 0]);
            }
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Square wooden frame with a transparent middle.
fn paint_frame() -> RgbaImage {
    let s = FRAME_SPRITE;
    let mut img = RgbaImage::new(s, s);
    for y in 0..s {
        for x in 0..s {
            let edge = x.min(y).min(s - 1 - x).min(s - 1 - y);
            let px = if edge >= FRAME_BORDER {
                Rgba([0, 0, 0, 0])
            } else if edge < 2 || edge >= FRAME_BORDER - 2 {
                Rgba([70, 42, 22, 255])
            } else if edge < 5 {
                Rgba([188, 132, 76, 255])
            } else {
                Rgba([134, 84, 40, 255])
            };
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Round-headed push pin.
fn paint_pin() -> RgbaImage {
    let s = PIN_SPRITE;
    let mut img = RgbaImage::new(s, s);
    // Stem first so the head overlaps it.
    for y in 14..s - 1 {
        for x in (s / 2 - 1)..(s / 2 + 1) {
            img.put_pixel(x, y, Rgba([116, 116, 124, 255]));
        }
    }
    let (cx, cy, r) = (s as f32 * 0.5, s as f32 * 0.42, s as f32 * 0.36);
    for y in 0..s {
        for x in 0..s {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            if d < r - 1.5 {
                img.put_pixel(x, y, Rgba([202, 58, 48, 255]));
            } else if d < r {
                img.put_pixel(x, y, Rgba([138, 30, 26, 255]));
            }
        }
    }
    // Specular dot up-left of center.
    for (dx, dy) in [(0i32, 0i32), (1, 0), (0, 1)] {
        let x = (cx - 3.0) as i32 + dx;
        let y = (cy - 3.0) as i32 + dy;
        img.put_pixel(x as u32, y as u32, Rgba([255, 202, 192, 255]));
    }
    img
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_paints_four_artworks() {
        let g = Gallery::new();
        assert_eq!(g.artwork_count(), 4);
        for art in g.artworks() {
            assert_eq!(art.dimensions(), (ARTWORK_SIZE, ARTWORK_SIZE));
        }
    }

    #[test]
    fn catalog_entry_resolves_by_artwork() {
        let g = Gallery::new();
        let meta = g.metadata_for(0);
        assert_eq!(meta.dimensions, "5 x 5");
        assert_eq!(meta.medium, "pixel art");
        assert_eq!(meta.year, "2024");
        assert!(meta.frame.is_some());
    }

    #[test]
    fn missing_catalog_entry_falls_back_to_placeholder() {
        let g = Gallery::new();
        // "ember" has no catalog entry.
        assert_eq!(*g.metadata_for(3), ArtworkMeta::placeholder());
        // Out-of-range artwork ids get the same treatment.
        assert_eq!(*g.metadata_for(42), ArtworkMeta::placeholder());
    }

    #[test]
    fn caption_keeps_the_fixed_field_order() {
        let g = Gallery::new();
        let caption = g.metadata_for(0).caption("Dawn");
        assert_eq!(caption, "Dawn\n5 x 5, pixel art, 2024");
    }

    #[test]
    fn placeholder_caption_still_reads() {
        let meta = ArtworkMeta::placeholder();
        assert_eq!(meta.caption("Untitled"), "Untitled\nN/A, N/A, N/A");
    }

    #[test]
    fn sprites_have_the_expected_shape() {
        let g = Gallery::new();
        // Tape is translucent in the body ...
        let tape_mid = g.tape().get_pixel(TAPE_SPRITE_W / 2, TAPE_SPRITE_H / 2);
        assert!(tape_mid[3] > 0 && tape_mid[3] < 255);
        // ... the frame is hollow ...
        assert_eq!(g.frame().get_pixel(FRAME_SPRITE / 2, FRAME_SPRITE / 2)[3], 0);
        assert_eq!(g.frame().get_pixel(0, 0)[3], 255);
        // ... and the pin head is red.
        let head = g.pin().get_pixel(PIN_SPRITE / 2, PIN_SPRITE / 2);
        assert!(head[0] > 150 && head[0] > head[1]);
    }
}
