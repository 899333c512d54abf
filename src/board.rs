//! Board state machine: zones, artwork items, decorations, doodles, and the
//! drag/placement rules that connect them.
//!
//! Everything in here works in **board-local coordinates** (origin at the
//! board's top-left corner). The canvas translates pointer positions into
//! this space on the way in and translates rects back out when drawing, so
//! the whole model stays independent of where the window puts the board —
//! and fully unit-testable without a GUI.

use crate::theme;
use egui::emath::Rot2;
use egui::{Color32, Pos2, Rect, Vec2};
use uuid::Uuid;

/// How many artwork items a fresh board starts with.
pub const ITEM_COUNT: usize = 5;

/// Zone grid shape, row-major.
pub const ZONE_ROWS: usize = 2;
pub const ZONE_COLS: usize = 5;

// Zone grid geometry as fractions of the board rectangle. Captured once at
// session setup; zone rects are never recomputed afterwards.
const ZONE_MARGIN_X: f32 = 0.05;
const ZONE_GAP_X: f32 = 0.025;
const ZONE_TOP_Y: f32 = 0.07;
const ZONE_GAP_Y: f32 = 0.045;
const ZONE_HEIGHT: f32 = 0.24;

/// Item edge length as a fraction of board width (items are square).
const ITEM_SIZE: f32 = 0.10;

/// Where evicted items land, as fractions of board width/height. Every
/// eviction goes to this same spot.
const OVERFLOW_X: f32 = 0.04;
const OVERFLOW_Y: f32 = 0.78;

// Shelf row for items that never got a zone (more items than zones).
const SHELF_X: f32 = 0.18;
const SHELF_PITCH: f32 = 0.12;

/// Doodle dot radius as a fraction of board width.
const DOODLE_RADIUS: f32 = 0.01;

// Decoration footprints as fractions of board width.
const TAPE_WIDTH: f32 = 0.11;
const TAPE_ASPECT: f32 = 0.26;
const FRAME_WIDTH: f32 = 0.13;

/// One rotation step for decorations, in degrees.
pub const ROTATION_STEP_DEG: f32 = 45.0;

// ============================================================================
// SESSION RNG
// ============================================================================

/// Deterministic splitmix64 stream. One per session, seeded at creation, so
/// a seed fully determines the initial zone assignment and every paint pick.
#[derive(Clone, Debug)]
pub struct SessionRng {
    state: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform pick in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// In-place Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_below(i + 1);
            slice.swap(i, j);
        }
    }
}

// ============================================================================
// BOARD MODEL
// ============================================================================

/// A numbered drop well. `id` is the index in creation (scan) order; the
/// on-screen label is `id + 1`.
#[derive(Clone, Debug)]
pub struct Zone {
    pub id: usize,
    pub rect: Rect,
    /// Occupant item id. Kept consistent with `Item::zone` at all times.
    pub item: Option<usize>,
    /// Paint-bucket tint; `None` means the resting well color.
    pub fill: Option<Color32>,
}

impl Zone {
    pub fn occupied(&self) -> bool {
        self.item.is_some()
    }

    /// Strict containment for placement: a point on any edge is a miss.
    pub fn contains_open(&self, p: Pos2) -> bool {
        p.x > self.rect.min.x && p.x < self.rect.max.x && p.y > self.rect.min.y && p.y < self.rect.max.y
    }
}

/// A draggable artwork. `artwork` indexes the gallery and is the identity
/// used for metadata lookup; `display_name` is whatever the user typed.
#[derive(Clone, Debug)]
pub struct Item {
    pub id: usize,
    pub artwork: usize,
    /// Top-left corner, board-local. Mutated directly while dragged.
    pub pos: Pos2,
    pub size: Vec2,
    /// Back-reference to the containing zone, if any.
    pub zone: Option<usize>,
    pub display_name: Option<String>,
    /// Set the first time a name is actually submitted; once true the
    /// naming prompt never reopens for this item.
    pub named: bool,
    /// A pin sprite is drawn while the item sits in a zone.
    pub pinned: bool,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationKind {
    Tape,
    Frame,
}

impl DecorationKind {
    pub fn label(&self) -> &'static str {
        match self {
            DecorationKind::Tape => "Tape",
            DecorationKind::Frame => "Frame",
        }
    }
}

/// A freely placed tape strip or empty frame. Identity is the index into the
/// append-only `Session::decorations` vector; insertion order is paint order.
#[derive(Clone, Debug)]
pub struct Decoration {
    pub kind: DecorationKind,
    /// Top-left of the unrotated footprint, board-local.
    pub pos: Pos2,
    pub size: Vec2,
    /// Multiple of [`ROTATION_STEP_DEG`], wrapped into `[0, 360)`.
    pub rotation_deg: f32,
}

impl Decoration {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }

    /// Point test against the rotated footprint: the probe is rotated back
    /// around the center and tested against the unrotated rect.
    pub fn hit(&self, p: Pos2) -> bool {
        let rect = self.rect();
        let center = rect.center();
        let local = center + Rot2::from_angle(-self.rotation_deg.to_radians()) * (p - center);
        rect.contains(local)
    }
}

/// One ink dot from doodle mode.
#[derive(Clone, Copy, Debug)]
pub struct DoodleDot {
    pub pos: Pos2,
    pub radius: f32,
}

/// What is being carried by the active drag.
#[derive(Clone, Debug)]
pub enum DragTarget {
    Item(usize),
    /// A decoration spawned from a toolbar template; it only joins
    /// `Session::decorations` when the drag ends.
    NewDecoration(Decoration),
}

/// The single in-flight drag. Holding this in an `Option` makes
/// at-most-one-drag structural: every move/release handler checks the slot
/// at entry, and a second press while it is full is ignored.
#[derive(Clone, Debug)]
pub struct DragSession {
    pub target: DragTarget,
    /// Pointer minus entity top-left at press time; constant for the drag so
    /// the grab point stays under the cursor.
    pub grab_offset: Vec2,
}

/// Exclusive interaction mode. One enum, so the mode exclusivities (paint
/// clicks never rotate, rotate clicks never paint, ...) hold by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Plain drag-and-drop of artwork and decorations.
    #[default]
    Arrange,
    Rotate,
    Paint,
    Doodle,
}

impl InteractionMode {
    pub fn label(&self) -> &'static str {
        match self {
            InteractionMode::Arrange => "Arrange",
            InteractionMode::Rotate => "Rotate",
            InteractionMode::Paint => "Paint",
            InteractionMode::Doodle => "Doodle",
        }
    }

    pub fn all() -> &'static [InteractionMode] {
        &[
            InteractionMode::Arrange,
            InteractionMode::Rotate,
            InteractionMode::Paint,
            InteractionMode::Doodle,
        ]
    }

    /// Short usage hint shown at the right edge of the toolbar.
    pub fn hint(&self) -> &'static str {
        match self {
            InteractionMode::Arrange => "drag artwork into the numbered wells",
            InteractionMode::Rotate => "click tape or a frame to turn it 45°",
            InteractionMode::Paint => "click a well to tint it",
            InteractionMode::Doodle => "hold the mouse down to ink dots",
        }
    }
}

/// How a drop resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// No zone under the item's center; it stays free at the drop position.
    Freed { item: usize },
    Placed {
        item: usize,
        zone: usize,
        /// Previous occupant bumped to the overflow spot, if any.
        evicted: Option<usize>,
        /// True when the item has never been named; the caller should open
        /// the naming prompt.
        first_naming: bool,
    },
}

// ============================================================================
// SESSION
// ============================================================================

/// All board state for one sitting. Owns the registries, the mode, the drag
/// slot, and the RNG; passed explicitly to every component that needs it.
pub struct Session {
    pub id: Uuid,
    pub zones: Vec<Zone>,
    pub items: Vec<Item>,
    pub decorations: Vec<Decoration>,
    pub doodles: Vec<DoodleDot>,
    pub mode: InteractionMode,
    pub drag: Option<DragSession>,
    board_rect: Rect,
    overflow_pos: Pos2,
    doodle_radius: f32,
    rng: SessionRng,
    initialized: bool,
}

impl Session {
    /// An empty session. Call [`Session::initialize`] once the board size is
    /// known to build the zone grid and deal out the starting items.
    pub fn new(seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            zones: Vec::new(),
            items: Vec::new(),
            decorations: Vec::new(),
            doodles: Vec::new(),
            mode: InteractionMode::default(),
            drag: None,
            board_rect: Rect::from_min_size(Pos2::ZERO, Vec2::ZERO),
            overflow_pos: Pos2::ZERO,
            doodle_radius: 0.0,
            rng: SessionRng::new(seed),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Board-local rectangle (min is always the origin).
    pub fn board_rect(&self) -> Rect {
        self.board_rect
    }

    /// Build the zone grid and deal the starting items into random distinct
    /// zones. Runs once; later calls are ignored.
    ///
    /// Items cycle through the gallery (`artwork = index % artwork_count`).
    /// If there are more items than zones, the excess start unplaced on the
    /// shelf row. Initial placements attach no pins and prompt no naming.
    pub fn initialize(&mut self, board_size: Vec2, artwork_count: usize, item_count: usize) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.board_rect = Rect::from_min_size(Pos2::ZERO, board_size);
        self.overflow_pos = Pos2::new(board_size.x * OVERFLOW_X, board_size.y * OVERFLOW_Y);
        self.doodle_radius = board_size.x * DOODLE_RADIUS;
        self.build_zones();

        if artwork_count == 0 {
            return;
        }

        let mut deck: Vec<usize> = (0..self.zones.len()).collect();
        self.rng.shuffle(&mut deck);

        let item_size = Vec2::splat(board_size.x * ITEM_SIZE);
        for i in 0..item_count {
            let mut item = Item {
                id: i,
                artwork: i % artwork_count,
                pos: self.shelf_pos(i.saturating_sub(self.zones.len())),
                size: item_size,
                zone: None,
                display_name: None,
                named: false,
                pinned: false,
            };
            if let Some(&zone_id) = deck.get(i) {
                item.pos = self.zones[zone_id].rect.center() - item_size * 0.5;
                item.zone = Some(zone_id);
                self.zones[zone_id].item = Some(i);
            }
            self.items.push(item);
        }
    }

    fn build_zones(&mut self) {
        let size = self.board_rect.size();
        let gap_x = size.x * ZONE_GAP_X;
        let zone_w =
            (size.x * (1.0 - 2.0 * ZONE_MARGIN_X) - gap_x * (ZONE_COLS - 1) as f32) / ZONE_COLS as f32;
        let zone_h = size.y * ZONE_HEIGHT;
        for row in 0..ZONE_ROWS {
            for col in 0..ZONE_COLS {
                let min = Pos2::new(
                    size.x * ZONE_MARGIN_X + col as f32 * (zone_w + gap_x),
                    size.y * ZONE_TOP_Y + row as f32 * (zone_h + size.y * ZONE_GAP_Y),
                );
                self.zones.push(Zone {
                    id: self.zones.len(),
                    rect: Rect::from_min_size(min, Vec2::new(zone_w, zone_h)),
                    item: None,
                    fill: None,
                });
            }
        }
    }

    fn shelf_pos(&self, slot: usize) -> Pos2 {
        let size = self.board_rect.size();
        Pos2::new(size.x * (SHELF_X + SHELF_PITCH * slot as f32), size.y * OVERFLOW_Y)
    }

    fn decoration_size(&self, kind: DecorationKind) -> Vec2 {
        let bw = self.board_rect.width();
        match kind {
            DecorationKind::Tape => Vec2::new(bw * TAPE_WIDTH, bw * TAPE_WIDTH * TAPE_ASPECT),
            DecorationKind::Frame => Vec2::splat(bw * FRAME_WIDTH),
        }
    }

    /// Topmost item under the point, picking in reverse id order since items
    /// draw in id order.
    pub fn item_at(&self, p: Pos2) -> Option<usize> {
        self.items.iter().rev().find(|item| item.rect().contains(p)).map(|item| item.id)
    }

    /// Id of the item currently being carried, if the drag holds one.
    pub fn dragged_item(&self) -> Option<usize> {
        match &self.drag {
            Some(DragSession { target: DragTarget::Item(id), .. }) => Some(*id),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Drag controller
    // ------------------------------------------------------------------

    /// Pick up an item. Ignored while another drag is active or for an
    /// unknown id. Pickup removes the pin; placement restores it.
    pub fn begin_item_drag(&mut self, item_id: usize, pointer: Pos2) {
        if self.drag.is_some() {
            return;
        }
        let Some(item) = self.items.get_mut(item_id) else {
            return;
        };
        item.pinned = false;
        self.drag = Some(DragSession {
            grab_offset: pointer - item.pos,
            target: DragTarget::Item(item_id),
        });
    }

    /// Spawn a fresh decoration centered under the pointer and start carrying
    /// it. Ignored while another drag is active or before initialization.
    pub fn begin_decoration_drag(&mut self, kind: DecorationKind, pointer: Pos2) {
        if self.drag.is_some() || !self.initialized {
            return;
        }
        let size = self.decoration_size(kind);
        self.drag = Some(DragSession {
            grab_offset: size * 0.5,
            target: DragTarget::NewDecoration(Decoration {
                kind,
                pos: pointer - size * 0.5,
                size,
                rotation_deg: 0.0,
            }),
        });
    }

    /// Move the carried entity so the grab point follows the pointer. No-op
    /// when nothing is being dragged.
    pub fn update_drag(&mut self, pointer: Pos2) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        let pos = pointer - drag.grab_offset;
        match &mut drag.target {
            DragTarget::Item(id) => {
                if let Some(item) = self.items.get_mut(*id) {
                    item.pos = pos;
                }
            }
            DragTarget::NewDecoration(piece) => piece.pos = pos,
        }
    }

    /// Finish the drag at the pointer. Items go through placement
    /// resolution; new decorations are committed to the board. Release
    /// always finalizes — there is no abort path.
    pub fn end_drag(&mut self, pointer: Pos2) -> Option<PlacementOutcome> {
        let drag = self.drag.take()?;
        let pos = pointer - drag.grab_offset;
        match drag.target {
            DragTarget::Item(id) => {
                self.items[id].pos = pos;
                Some(self.drop_item(id))
            }
            DragTarget::NewDecoration(mut piece) => {
                piece.pos = pos;
                self.decorations.push(piece);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Placement resolver
    // ------------------------------------------------------------------

    /// Resolve a dropped item against the zone grid. The first zone in
    /// creation order that strictly contains the item's center wins; edge
    /// contact counts as a miss. A hit on an occupied zone bumps the
    /// occupant to the overflow spot — never a swap.
    fn drop_item(&mut self, item_id: usize) -> PlacementOutcome {
        let center = self.items[item_id].center();
        let target = self.zones.iter().find(|z| z.contains_open(center)).map(|z| z.id);

        let Some(zone_id) = target else {
            if let Some(prev) = self.items[item_id].zone.take() {
                self.zones[prev].item = None;
            }
            self.items[item_id].pinned = false;
            return PlacementOutcome::Freed { item: item_id };
        };

        if let Some(prev) = self.items[item_id].zone
            && prev != zone_id
        {
            self.zones[prev].item = None;
        }

        let mut evicted = None;
        if let Some(occupant) = self.zones[zone_id].item
            && occupant != item_id
        {
            self.items[occupant].zone = None;
            self.items[occupant].pinned = false;
            self.items[occupant].pos = self.overflow_pos;
            evicted = Some(occupant);
        }

        let size = self.items[item_id].size;
        self.items[item_id].pos = self.zones[zone_id].rect.center() - size * 0.5;
        self.items[item_id].zone = Some(zone_id);
        self.items[item_id].pinned = true;
        self.zones[zone_id].item = Some(item_id);

        PlacementOutcome::Placed {
            item: item_id,
            zone: zone_id,
            evicted,
            first_naming: !self.items[item_id].named,
        }
    }

    // ------------------------------------------------------------------
    // Naming
    // ------------------------------------------------------------------

    /// Record a submitted display name. The caller has already trimmed and
    /// rejected empty input; cancellation never reaches this method, which
    /// is what keeps `named` false after a dismissed prompt.
    pub fn apply_name(&mut self, item_id: usize, name: String) {
        if let Some(item) = self.items.get_mut(item_id) {
            item.display_name = Some(name);
            item.named = true;
        }
    }

    // ------------------------------------------------------------------
    // Decorations, paint, doodles
    // ------------------------------------------------------------------

    /// Rotate the topmost decoration under the point one step clockwise,
    /// wrapping at a full turn. Returns the decoration index when one was
    /// hit.
    pub fn rotate_decoration_at(&mut self, p: Pos2) -> Option<usize> {
        let idx = self.decorations.iter().rposition(|piece| piece.hit(p))?;
        let piece = &mut self.decorations[idx];
        piece.rotation_deg = normalize_angle(piece.rotation_deg + ROTATION_STEP_DEG);
        Some(idx)
    }

    /// Tint the first zone containing the point with a random palette color.
    /// Every click re-rolls independently; repeats are allowed.
    pub fn paint_zone_at(&mut self, p: Pos2) -> Option<usize> {
        let idx = self.zones.iter().position(|z| z.rect.contains(p))?;
        let color = theme::PAINT_PALETTE[self.rng.next_below(theme::PAINT_PALETTE.len())];
        self.zones[idx].fill = Some(color);
        Some(idx)
    }

    /// Stamp one ink dot at the pointer.
    pub fn doodle_at(&mut self, p: Pos2) {
        self.doodles.push(DoodleDot { pos: p, radius: self.doodle_radius });
    }

    /// Select a mode, or drop back to [`InteractionMode::Arrange`] when the
    /// active mode is selected again.
    pub fn toggle_mode(&mut self, mode: InteractionMode) {
        self.mode = if self.mode == mode { InteractionMode::Arrange } else { mode };
    }

    /// True when every zone/item back-reference agrees with the forward one.
    pub fn links_consistent(&self) -> bool {
        let zones_ok = self.zones.iter().all(|z| match z.item {
            Some(i) => self.items.get(i).is_some_and(|item| item.zone == Some(z.id)),
            None => true,
        });
        let items_ok = self.items.iter().all(|item| match item.zone {
            Some(z) => self.zones.get(z).is_some_and(|zone| zone.item == Some(item.id)),
            None => true,
        });
        zones_ok && items_ok
    }
}

/// Wrap an angle into `[0, 360)`.
fn normalize_angle(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

// ============================================================================
// TESTS
// ============================================================================
