//! Live board canvas: translates pointer input into `Session` operations and
//! draws the scene.
//!
//! The session works in board-local coordinates; this is the only place that
//! knows where egui put the board rectangle this frame, so every pointer
//! position is translated on the way in and every model rect on the way out.
//! Stacking order matches the export compositor: ground, zones, doodles,
//! artwork, pins, decorations, then whatever is being carried.

use crate::assets::Gallery;
use crate::board::{
    Decoration, DecorationKind, DragTarget, ITEM_COUNT, InteractionMode, Item, PlacementOutcome,
    Session,
};
use crate::theme;
use eframe::egui;
use egui::emath::Rot2;
use egui::{
    Align2, Color32, ColorImage, FontId, Mesh, Painter, Pos2, Rect, Sense, Shape, Stroke,
    TextureHandle, TextureOptions, Vec2,
};
use image::RgbaImage;

/// GPU copies of the gallery sprites, uploaded on the first frame.
struct SpriteTextures {
    artworks: Vec<TextureHandle>,
    tape: TextureHandle,
    frame: TextureHandle,
    pin: TextureHandle,
}

impl SpriteTextures {
    fn upload(ctx: &egui::Context, gallery: &Gallery) -> Self {
        let artworks = gallery
            .artworks()
            .iter()
            .enumerate()
            .map(|(i, img)| load_texture(ctx, &format!("artwork_{}", i), img))
            .collect();
        Self {
            artworks,
            tape: load_texture(ctx, "tape", gallery.tape()),
            frame: load_texture(ctx, "frame", gallery.frame()),
            pin: load_texture(ctx, "pin", gallery.pin()),
        }
    }
}

fn load_texture(ctx: &egui::Context, name: &str, img: &RgbaImage) -> TextureHandle {
    let color = ColorImage::from_rgba_unmultiplied(
        [img.width() as usize, img.height() as usize],
        img.as_raw(),
    );
    ctx.load_texture(name, color, TextureOptions::LINEAR)
}

/// The central board widget.
#[derive(Default)]
pub struct BoardCanvas {
    textures: Option<SpriteTextures>,
    /// Screen position of the board's top-left corner, refreshed each frame.
    origin: Pos2,
    /// Last known pointer position, board-local. Lets a release without a
    /// pointer position still finalize the drag.
    last_pointer: Pos2,
}

impl BoardCanvas {
    /// Translate a screen position into board-local coordinates.
    pub fn to_board(&self, screen: Pos2) -> Pos2 {
        screen - self.origin.to_vec2()
    }

    /// Lay out the board, route input, draw. Returns the placement outcome
    /// when an item drag ended this frame.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &mut Session,
        gallery: &Gallery,
    ) -> Option<PlacementOutcome> {
        let sense = Sense::click_and_drag().union(Sense::hover());
        let (response, painter) = ui.allocate_painter(ui.available_size(), sense);
        let board_rect = response.rect;
        self.origin = board_rect.min;

        // The grid is laid out once, from the first board rectangle we see.
        if !session.is_initialized() {
            session.initialize(board_rect.size(), gallery.artwork_count(), ITEM_COUNT);
            crate::log_info!(
                "board initialized at {:.0}x{:.0}, {} zones, {} items",
                board_rect.width(),
                board_rect.height(),
                session.zones.len(),
                session.items.len()
            );
        }

        if let Some(p) = ui.input(|i| i.pointer.interact_pos()) {
            self.last_pointer = self.to_board(p);
        }
        let pointer = self.last_pointer;

        // -- input routing --------------------------------------------------

        if session.mode == InteractionMode::Arrange
            && response.drag_started()
            && let Some(id) = session.item_at(pointer)
        {
            session.begin_item_drag(id, pointer);
        }

        // Drags are driven from raw pointer state rather than the response,
        // so a drag that began on a toolbar template keeps tracking here.
        let mut outcome = None;
        if session.drag.is_some() {
            if ui.input(|i| i.pointer.primary_down()) {
                session.update_drag(pointer);
            } else {
                outcome = session.end_drag(pointer);
            }
            ui.ctx().request_repaint();
        }

        if response.clicked() {
            match session.mode {
                InteractionMode::Rotate => {
                    session.rotate_decoration_at(pointer);
                }
                InteractionMode::Paint => {
                    session.paint_zone_at(pointer);
                }
                InteractionMode::Arrange | InteractionMode::Doodle => {}
            }
        }

        if session.mode == InteractionMode::Doodle
            && response.hovered()
            && ui.input(|i| i.pointer.primary_down())
        {
            session.doodle_at(pointer);
            ui.ctx().request_repaint();
        }

        // -- drawing --------------------------------------------------------

        let textures = self
            .textures
            .get_or_insert_with(|| SpriteTextures::upload(ui.ctx(), gallery));
        let off = board_rect.min.to_vec2();

        painter.rect_filled(board_rect, 0.0, theme::BOARD_BACKGROUND);

        for zone in &session.zones {
            let rect = zone.rect.translate(off);
            painter.rect_filled(rect, 4.0, zone.fill.unwrap_or(theme::ZONE_EMPTY_FILL));
            painter.rect_stroke(rect, 4.0, Stroke::new(2.0, theme::ZONE_OUTLINE));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                (zone.id + 1).to_string(),
                FontId::proportional(theme::ZONE_NUMBER_FONT),
                theme::ZONE_NUMBER,
            );
        }

        for dot in &session.doodles {
            painter.circle_filled(dot.pos + off, dot.radius, theme::DOODLE_INK);
        }

        let carried = session.dragged_item();
        for item in &session.items {
            if carried == Some(item.id) {
                continue;
            }
            draw_item(&painter, textures, gallery, item, off, false);
        }
        for item in &session.items {
            if item.pinned && carried != Some(item.id) {
                draw_pin(&painter, textures, item, off);
            }
        }

        for piece in &session.decorations {
            draw_decoration(&painter, textures, piece, off);
        }

        // The carried entity rides on top of everything.
        if let Some(drag) = &session.drag {
            match &drag.target {
                DragTarget::Item(id) => {
                    if let Some(item) = session.items.get(*id) {
                        draw_item(&painter, textures, gallery, item, off, true);
                    }
                }
                DragTarget::NewDecoration(piece) => draw_decoration(&painter, textures, piece, off),
            }
        }

        outcome
    }
}

fn draw_item(
    painter: &Painter,
    textures: &SpriteTextures,
    gallery: &Gallery,
    item: &Item,
    off: Vec2,
    carried: bool,
) {
    let rect = item.rect().translate(off);
    if carried {
        painter.rect_filled(rect.translate(Vec2::new(4.0, 6.0)), 0.0, theme::DRAG_SHADOW);
    }
    if let Some(tex) = textures.artworks.get(item.artwork) {
        painter.image(tex.id(), rect, uv_full(), Color32::WHITE);
    }
    if let Some(name) = &item.display_name {
        let caption = gallery.metadata_for(item.artwork).caption(name);
        painter.text(
            Pos2::new(rect.center().x, rect.max.y + theme::CAPTION_GAP),
            Align2::CENTER_TOP,
            caption,
            FontId::proportional(theme::CAPTION_FONT),
            theme::CAPTION_TEXT,
        );
    }
}

fn draw_pin(painter: &Painter, textures: &SpriteTextures, item: &Item, off: Vec2) {
    let rect = item.rect().translate(off);
    let pin_rect = Rect::from_center_size(
        Pos2::new(rect.center().x, rect.min.y),
        Vec2::splat(item.size.x * theme::PIN_SIZE_FRACTION),
    );
    painter.image(textures.pin.id(), pin_rect, uv_full(), Color32::WHITE);
}

/// Decorations draw as a textured quad rotated about its own center.
fn draw_decoration(painter: &Painter, textures: &SpriteTextures, piece: &Decoration, off: Vec2) {
    let tex = match piece.kind {
        DecorationKind::Tape => &textures.tape,
        DecorationKind::Frame => &textures.frame,
    };
    let rect = piece.rect().translate(off);
    let center = rect.center();
    let rot = Rot2::from_angle(piece.rotation_deg.to_radians());
    let mut mesh = Mesh::with_texture(tex.id());
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    let uvs = [
        Pos2::ZERO,
        Pos2::new(1.0, 0.0),
        Pos2::new(1.0, 1.0),
        Pos2::new(0.0, 1.0),
    ];
    for (corner, uv) in corners.into_iter().zip(uvs) {
        mesh.vertices.push(egui::epaint::Vertex {
            pos: center + rot * (corner - center),
            uv,
            color: Color32::WHITE,
        });
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    painter.add(Shape::mesh(mesh));
}

fn uv_full() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}
