//! Scripted end-to-end sittings driven through the public library API:
//! deal a board, move artwork between wells, name it, decorate, paint,
//! doodle, and flatten the result to a PNG on disk.

use egui::{Pos2, Vec2};
use moodfe::assets::Gallery;
use moodfe::board::{
    DecorationKind, ITEM_COUNT, InteractionMode, PlacementOutcome, Session,
};
use moodfe::export;

const BOARD: Vec2 = Vec2::new(1200.0, 800.0);

fn fresh(seed: u64) -> Session {
    let mut s = Session::new(seed);
    s.initialize(BOARD, 4, ITEM_COUNT);
    s
}

/// A point below the zone grid, outside every well.
fn free_space() -> Pos2 {
    Pos2::new(BOARD.x * 0.5, BOARD.y * 0.95)
}

/// Drag an item by its center to `dest` in three pointer events.
fn drag_item_to(s: &mut Session, item: usize, dest: Pos2) -> Option<PlacementOutcome> {
    let grab = s.items[item].center();
    s.begin_item_drag(item, grab);
    s.update_drag(Pos2::new((grab.x + dest.x) * 0.5, (grab.y + dest.y) * 0.5));
    s.end_drag(dest)
}

/// Make sure `zone` is empty by dragging any occupant off the grid.
fn vacate(s: &mut Session, zone: usize) {
    if let Some(occupant) = s.zones[zone].item {
        let out = drag_item_to(s, occupant, free_space());
        assert_eq!(out, Some(PlacementOutcome::Freed { item: occupant }));
    }
}

#[test]
fn initial_deal_fills_half_the_grid() {
    let s = fresh(42);
    assert_eq!(s.zones.len(), 10);
    assert_eq!(s.items.len(), 5);
    assert_eq!(s.zones.iter().filter(|z| z.occupied()).count(), 5);
    assert_eq!(s.zones.iter().filter(|z| !z.occupied()).count(), 5);

    let mut held = Vec::new();
    for zone in s.zones.iter().filter(|z| z.occupied()) {
        let item = zone.item.unwrap();
        assert!(!held.contains(&item), "no two zones hold the same item");
        held.push(item);
    }
    assert!(s.links_consistent());
}

#[test]
fn moving_from_zone_three_to_zone_seven() {
    let mut s = fresh(42);
    vacate(&mut s, 3);
    vacate(&mut s, 7);

    let target = s.zones[3].rect.center();
    let out = drag_item_to(&mut s, 0, target);
    assert!(matches!(out, Some(PlacementOutcome::Placed { item: 0, zone: 3, .. })));

    let target = s.zones[7].rect.center();
    let out = drag_item_to(&mut s, 0, target);
    assert_eq!(
        out,
        Some(PlacementOutcome::Placed {
            item: 0,
            zone: 7,
            evicted: None,
            // Never named, so the prompt opens again on this placement.
            first_naming: true,
        })
    );
    assert_eq!(s.zones[3].item, None);
    assert_eq!(s.zones[7].item, Some(0));
    assert_eq!(s.items[0].zone, Some(7));
    assert!(s.links_consistent());
}

#[test]
fn dawn_caption_renders_the_catalog_fields_in_order() {
    let gallery = Gallery::new();
    let mut s = fresh(7);
    // Item 0 carries artwork "dawn": {5 x 5, pixel art, 2024}.
    assert_eq!(s.items[0].artwork, 0);
    s.apply_name(0, "Dawn".to_string());
    assert!(s.items[0].named);

    let name = s.items[0].display_name.as_deref().unwrap();
    let caption = gallery.metadata_for(s.items[0].artwork).caption(name);
    assert_eq!(caption, "Dawn\n5 x 5, pixel art, 2024");
}

#[test]
fn a_full_sitting() {
    let gallery = Gallery::new();
    let mut s = fresh(1234);

    // Move an item into an empty well; first placement wants a name.
    let empty = s.zones.iter().find(|z| !z.occupied()).unwrap().id;
    let item = s.zones.iter().find_map(|z| z.item).unwrap();
    let old_zone = s.items[item].zone.unwrap();
    let target = s.zones[empty].rect.center();
    let out = drag_item_to(&mut s, item, target);
    assert_eq!(
        out,
        Some(PlacementOutcome::Placed { item, zone: empty, evicted: None, first_naming: true })
    );
    assert!(!s.zones[old_zone].occupied());
    assert!(s.items[item].pinned);

    // The prompt was dismissed; the item stays unnamed until a real submit.
    assert!(!s.items[item].named);
    s.apply_name(item, "Quiet Harbor".to_string());
    assert!(s.items[item].named);

    // A second artwork dropped on the same well bumps the first out.
    let other = s.items.iter().find(|i| i.id != item && i.zone.is_some()).unwrap().id;
    let target = s.zones[empty].rect.center();
    let out = drag_item_to(&mut s, other, target);
    assert_eq!(
        out,
        Some(PlacementOutcome::Placed {
            item: other,
            zone: empty,
            evicted: Some(item),
            first_naming: true,
        })
    );
    assert_eq!(s.items[item].zone, None);
    assert!(!s.items[item].pinned);
    // Named survives eviction; only the zone binding is gone.
    assert!(s.items[item].named);
    assert!(s.links_consistent());

    // Dropping outside the grid frees the item.
    let out = drag_item_to(&mut s, other, free_space());
    assert_eq!(out, Some(PlacementOutcome::Freed { item: other }));
    assert!(!s.zones[empty].occupied());

    // Tape down in free space, then give it a quarter turn in rotate mode.
    let spot = free_space() - Vec2::new(200.0, 0.0);
    s.begin_decoration_drag(DecorationKind::Tape, spot);
    assert!(s.end_drag(spot).is_none());
    assert_eq!(s.decorations.len(), 1);

    s.toggle_mode(InteractionMode::Rotate);
    s.rotate_decoration_at(spot);
    s.rotate_decoration_at(spot);
    assert_eq!(s.decorations[0].rotation_deg, 90.0);

    // Switching to paint leaves rotate behind; tint a well.
    s.toggle_mode(InteractionMode::Paint);
    assert_eq!(s.mode, InteractionMode::Paint);
    let painted = s.paint_zone_at(s.zones[2].rect.center());
    assert_eq!(painted, Some(2));
    assert!(s.zones[2].fill.is_some());

    // A few doodle dots.
    s.toggle_mode(InteractionMode::Doodle);
    s.doodle_at(Pos2::new(100.0, 700.0));
    s.doodle_at(Pos2::new(104.0, 702.0));
    assert_eq!(s.doodles.len(), 2);

    // Flatten and save.
    let img = export::render_board(&s, &gallery);
    assert_eq!(img.dimensions(), (1200, 800));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export::suggested_file_name());
    export::write_png(&path, &img).unwrap();
    assert!(path.metadata().unwrap().len() > 0);

    assert!(s.links_consistent());
}

#[test]
fn restart_semantics_are_a_fresh_session() {
    let mut s = fresh(5);
    s.toggle_mode(InteractionMode::Paint);
    s.paint_zone_at(s.zones[0].rect.center());
    s.doodle_at(Pos2::new(50.0, 700.0));

    // A replacement session starts clean and relays out on initialize.
    let replacement = fresh(6);
    assert_ne!(s.id, replacement.id);
    assert!(replacement.decorations.is_empty());
    assert!(replacement.doodles.is_empty());
    assert!(replacement.zones.iter().all(|z| z.fill.is_none()));
    assert_eq!(replacement.mode, InteractionMode::Arrange);
}
