// Host-side tests for parent/child following and magnet drop points.

use glam::Vec2;
use rigging_core::{AttachOutcome, AttachPoint, AttachmentManager, ConnectorId, ElementId, ElementRegistry, Zone};

fn load_at(reg: &mut ElementRegistry, tpl: ElementId, pos: Vec2, size: Vec2) -> ElementId {
    reg.instantiate(tpl, pos, size).expect("template exists")
}

struct Board {
    reg: ElementRegistry,
    load: ElementId,
    gear: ElementId,
}

fn board() -> Board {
    let mut reg = ElementRegistry::new();
    let load = reg.add_template(Zone::Load, "load.png", Vec2::new(100.0, 100.0), None);
    let gear = reg.add_template(Zone::Linked, "gear.png", Vec2::new(10.0, 10.0), None);
    Board { reg, load, gear }
}

#[test]
fn first_containing_parent_wins_over_closer_one() {
    let mut b = board();
    let first = load_at(&mut b.reg, b.load, Vec2::ZERO, Vec2::splat(100.0));
    let second = load_at(&mut b.reg, b.load, Vec2::splat(60.0), Vec2::splat(100.0));
    // centre (90,90): inside both, much closer to the second's centre
    let child = load_at(&mut b.reg, b.gear, Vec2::splat(85.0), Vec2::splat(10.0));

    let mut mgr = AttachmentManager::new();
    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Attached(first));
    assert_ne!(mgr.parent_of(child), Some(second));
    let link = mgr.attachment(child).expect("linked");
    assert_eq!(link.offset, Vec2::splat(85.0));
}

#[test]
fn candidates_are_limited_to_the_parent_zone() {
    let mut b = board();
    let gear_parent = load_at(&mut b.reg, b.gear, Vec2::ZERO, Vec2::splat(100.0));
    let child = load_at(&mut b.reg, b.gear, Vec2::splat(40.0), Vec2::splat(10.0));
    let mut mgr = AttachmentManager::new();
    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Unattached);
    assert_eq!(mgr.parent_of(child), None);
    assert!(mgr.children_of(gear_parent).is_empty());
}

#[test]
fn reattach_replaces_and_missing_parent_releases() {
    let mut b = board();
    let p1 = load_at(&mut b.reg, b.load, Vec2::ZERO, Vec2::splat(100.0));
    let p2 = load_at(&mut b.reg, b.load, Vec2::new(300.0, 0.0), Vec2::splat(100.0));
    let child = load_at(&mut b.reg, b.gear, Vec2::splat(20.0), Vec2::splat(10.0));
    let mut mgr = AttachmentManager::new();

    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Attached(p1));
    b.reg.set_position(child, Vec2::new(320.0, 20.0));
    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Attached(p2));
    assert!(mgr.children_of(p1).is_empty());

    b.reg.set_position(child, Vec2::new(200.0, 300.0));
    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Released(p2));
    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Unattached);
}

#[test]
fn moving_a_parent_moves_the_whole_chain() {
    let mut b = board();
    let a = load_at(&mut b.reg, b.load, Vec2::ZERO, Vec2::splat(100.0));
    // centre (100,100) sits on a's far corner
    let mid = load_at(&mut b.reg, b.load, Vec2::splat(80.0), Vec2::splat(40.0));
    // centre (115,115): outside a, inside mid
    let leaf = load_at(&mut b.reg, b.gear, Vec2::splat(110.0), Vec2::splat(10.0));

    let mut mgr = AttachmentManager::new();
    assert_eq!(mgr.try_attach(&b.reg, mid, Zone::Load), AttachOutcome::Attached(a));
    assert_eq!(mgr.try_attach(&b.reg, leaf, Zone::Load), AttachOutcome::Attached(mid));

    b.reg.set_position(a, Vec2::new(10.0, 5.0));
    let moved = mgr.propagate_move(a, &mut b.reg);
    assert_eq!(moved, vec![mid, leaf]);
    assert_eq!(b.reg.get(mid).map(|e| e.position), Some(Vec2::new(90.0, 85.0)));
    assert_eq!(b.reg.get(leaf).map(|e| e.position), Some(Vec2::new(120.0, 115.0)));
    assert!(mgr.is_descendant(leaf, a));
    assert!(!mgr.is_descendant(a, leaf));
}

#[test]
fn an_element_never_attaches_to_its_own_descendant() {
    let mut b = board();
    let a = load_at(&mut b.reg, b.load, Vec2::ZERO, Vec2::splat(100.0));
    let child = load_at(&mut b.reg, b.load, Vec2::splat(30.0), Vec2::splat(40.0));
    let mut mgr = AttachmentManager::new();
    assert_eq!(mgr.try_attach(&b.reg, child, Zone::Load), AttachOutcome::Attached(a));

    // a's centre (50,50) lies inside its own child; that candidate is skipped
    assert_eq!(mgr.try_attach(&b.reg, a, Zone::Load), AttachOutcome::Unattached);
    assert_eq!(mgr.parent_of(a), None);

    b.reg.set_position(a, Vec2::new(5.0, 5.0));
    assert_eq!(mgr.propagate_move(a, &mut b.reg), vec![child]);
}

#[test]
fn forget_drops_links_in_both_directions() {
    let mut b = board();
    let a = load_at(&mut b.reg, b.load, Vec2::ZERO, Vec2::splat(100.0));
    let mid = load_at(&mut b.reg, b.load, Vec2::splat(30.0), Vec2::splat(40.0));
    let leaf = load_at(&mut b.reg, b.gear, Vec2::splat(45.0), Vec2::splat(10.0));
    let mut mgr = AttachmentManager::new();
    mgr.try_attach(&b.reg, mid, Zone::Load);
    // leaf's centre is inside both; a comes first
    mgr.try_attach(&b.reg, leaf, Zone::Load);
    assert_eq!(mgr.parent_of(leaf), Some(a));

    mgr.forget(a);
    assert_eq!(mgr.parent_of(mid), None);
    assert_eq!(mgr.parent_of(leaf), None);
    assert!(mgr.detach(leaf).is_none());
}

#[test]
fn propagate_from_unknown_parent_is_a_no_op() {
    let mut b = board();
    let mgr = AttachmentManager::new();
    assert!(mgr.propagate_move(ElementId(999), &mut b.reg).is_empty());
}

#[test]
fn nearby_attach_point_picks_the_closest_within_radius() {
    let mut mgr = AttachmentManager::new();
    mgr.set_attach_points(vec![
        AttachPoint {
            connector: ConnectorId(1),
            point: Vec2::ZERO,
        },
        AttachPoint {
            connector: ConnectorId(2),
            point: Vec2::new(30.0, 0.0),
        },
    ]);
    let hit = mgr.find_nearby_attach_point(Vec2::new(20.0, 0.0), 50.0).expect("in range");
    assert_eq!(hit.connector, ConnectorId(2));

    assert!(mgr.find_nearby_attach_point(Vec2::new(80.0, 0.0), 50.0).is_none());
    assert!(mgr.find_nearby_attach_point(Vec2::new(0.0, 200.0), 50.0).is_none());
}
