// Host-side tests for the drag gesture state machine.

use glam::Vec2;
use rigging_core::{DragEvent, DragIntent, DragOrigin, DragPhase, DropTarget, ElementId, GestureSource, Zone};

const EL: ElementId = ElementId(7);

fn start(origin: DragOrigin, source: GestureSource) -> DragEvent {
    DragEvent::Start {
        element: EL,
        origin,
        source,
        pointer: Vec2::new(110.0, 60.0),
        element_pos: Vec2::new(100.0, 50.0),
    }
}

#[test]
fn start_records_grab_offset() {
    let (phase, intent) = DragPhase::Idle.transition(start(DragOrigin::Canvas, GestureSource::Pointer));
    let session = phase.session().expect("dragging");
    assert_eq!(session.grab_offset, Vec2::new(10.0, 10.0));
    assert!(!session.moved);
    assert_eq!(
        intent,
        Some(DragIntent::Began {
            element: EL,
            origin: DragOrigin::Canvas
        })
    );
}

#[test]
fn canvas_copy_moves_with_the_pointer_minus_offset() {
    let (phase, _) = DragPhase::Idle.transition(start(DragOrigin::Canvas, GestureSource::Pointer));
    let (phase, intent) = phase.transition(DragEvent::Move {
        source: GestureSource::Pointer,
        pointer: Vec2::new(210.0, 160.0),
    });
    assert_eq!(
        intent,
        Some(DragIntent::MoveTo {
            element: EL,
            position: Vec2::new(200.0, 150.0)
        })
    );
    assert!(phase.session().is_some_and(|s| s.moved));
}

#[test]
fn templates_do_not_move_until_dropped() {
    let (phase, _) = DragPhase::Idle.transition(start(DragOrigin::Supply(Zone::Load), GestureSource::Touch));
    let (phase, intent) = phase.transition(DragEvent::Move {
        source: GestureSource::Touch,
        pointer: Vec2::new(300.0, 300.0),
    });
    assert_eq!(intent, None);
    let (phase, intent) = phase.transition(DragEvent::Drop {
        source: GestureSource::Touch,
        pointer: Vec2::new(300.0, 300.0),
        target: DropTarget::Canvas,
    });
    assert_eq!(phase, DragPhase::Idle);
    assert_eq!(
        intent,
        Some(DragIntent::PlaceCopy {
            template: EL,
            pointer: Vec2::new(300.0, 300.0)
        })
    );
}

#[test]
fn drop_resolution_by_origin_and_target() {
    let cases = [
        (DragOrigin::Supply(Zone::Linked), DropTarget::SupplyZone(Zone::Linked), DragIntent::Cancel { element: EL }),
        (DragOrigin::Supply(Zone::Linked), DropTarget::Outside, DragIntent::Cancel { element: EL }),
        (DragOrigin::Canvas, DropTarget::SupplyZone(Zone::Accessory), DragIntent::Discard { element: EL }),
        (DragOrigin::Canvas, DropTarget::Canvas, DragIntent::Settle { element: EL }),
        (DragOrigin::Canvas, DropTarget::Outside, DragIntent::Settle { element: EL }),
    ];
    for (origin, target, expected) in cases {
        let (phase, _) = DragPhase::Idle.transition(start(origin, GestureSource::Pointer));
        let (phase, intent) = phase.transition(DragEvent::Drop {
            source: GestureSource::Pointer,
            pointer: Vec2::ZERO,
            target,
        });
        assert_eq!(phase, DragPhase::Idle, "{origin:?} -> {target:?}");
        assert_eq!(intent, Some(expected), "{origin:?} -> {target:?}");
    }
}

#[test]
fn events_from_the_other_source_are_ignored() {
    let (phase, _) = DragPhase::Idle.transition(start(DragOrigin::Canvas, GestureSource::Pointer));
    let (phase, intent) = phase.transition(DragEvent::Move {
        source: GestureSource::Touch,
        pointer: Vec2::new(500.0, 500.0),
    });
    assert_eq!(intent, None);
    let (phase, intent) = phase.transition(DragEvent::Drop {
        source: GestureSource::Touch,
        pointer: Vec2::ZERO,
        target: DropTarget::Canvas,
    });
    assert_eq!(intent, None);
    assert!(phase.is_dragging());
}

#[test]
fn a_second_start_does_not_steal_the_gesture() {
    let (phase, _) = DragPhase::Idle.transition(start(DragOrigin::Canvas, GestureSource::Pointer));
    let before = phase;
    let (phase, intent) = phase.transition(DragEvent::Start {
        element: ElementId(8),
        origin: DragOrigin::Canvas,
        source: GestureSource::Touch,
        pointer: Vec2::ZERO,
        element_pos: Vec2::ZERO,
    });
    assert_eq!(intent, None);
    assert_eq!(phase, before);
}

#[test]
fn leaving_the_surface_cancels() {
    let (phase, _) = DragPhase::Idle.transition(start(DragOrigin::Canvas, GestureSource::Pointer));
    let (phase, intent) = phase.transition(DragEvent::Leave);
    assert_eq!(phase, DragPhase::Idle);
    assert_eq!(intent, Some(DragIntent::Cancel { element: EL }));
}

#[test]
fn idle_ignores_everything_but_start() {
    for event in [
        DragEvent::Leave,
        DragEvent::Move {
            source: GestureSource::Pointer,
            pointer: Vec2::ONE,
        },
        DragEvent::Drop {
            source: GestureSource::Pointer,
            pointer: Vec2::ONE,
            target: DropTarget::Canvas,
        },
    ] {
        assert_eq!(DragPhase::Idle.transition(event), (DragPhase::Idle, None));
    }
}
