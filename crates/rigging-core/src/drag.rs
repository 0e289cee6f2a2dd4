//! Drag gesture state machine.
//!
//! `DragPhase::transition` is a pure `(phase, event) → (phase, intent)`
//! function. It knows nothing about sizes, bounds or attachments; the
//! returned [`DragIntent`] tells the board what the gesture means and the
//! board applies it. Mouse/pen and touch feed the same events, so both
//! produce identical outcomes.

use crate::element::{ElementId, Zone};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureSource {
    Pointer,
    Touch,
}

/// Where the dragged element lived when the gesture began.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOrigin {
    /// A template sitting in its supply zone.
    Supply(Zone),
    /// A copy already placed on the canvas.
    Canvas,
}

/// What the pointer is over when it is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Canvas,
    /// A supply zone; dropping a canvas copy here deletes it.
    SupplyZone(Zone),
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub element: ElementId,
    pub origin: DragOrigin,
    pub source: GestureSource,
    /// Pointer minus the element's top-left at grab time.
    pub grab_offset: Vec2,
    pub last_pointer: Vec2,
    pub moved: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Start {
        element: ElementId,
        origin: DragOrigin,
        source: GestureSource,
        pointer: Vec2,
        element_pos: Vec2,
    },
    Move {
        source: GestureSource,
        pointer: Vec2,
    },
    Drop {
        source: GestureSource,
        pointer: Vec2,
        target: DropTarget,
    },
    /// The pointer left the interactive surface.
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragIntent {
    Began {
        element: ElementId,
        origin: DragOrigin,
    },
    /// Move a canvas copy so its top-left is at `position` (unclamped).
    MoveTo {
        element: ElementId,
        position: Vec2,
    },
    /// A template was dropped on the canvas at `pointer`.
    PlaceCopy {
        template: ElementId,
        pointer: Vec2,
    },
    /// A canvas copy was released over the canvas and stays where it is.
    Settle {
        element: ElementId,
    },
    /// A canvas copy was dropped back onto a supply zone.
    Discard {
        element: ElementId,
    },
    Cancel {
        element: ElementId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragPhase {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragPhase::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragPhase::Dragging(s) => Some(s),
            DragPhase::Idle => None,
        }
    }

    pub fn transition(self, event: DragEvent) -> (DragPhase, Option<DragIntent>) {
        match (self, event) {
            (
                DragPhase::Idle,
                DragEvent::Start {
                    element,
                    origin,
                    source,
                    pointer,
                    element_pos,
                },
            ) => {
                let session = DragSession {
                    element,
                    origin,
                    source,
                    grab_offset: pointer - element_pos,
                    last_pointer: pointer,
                    moved: false,
                };
                (
                    DragPhase::Dragging(session),
                    Some(DragIntent::Began { element, origin }),
                )
            }
            // one gesture at a time
            (phase @ DragPhase::Dragging(_), DragEvent::Start { .. }) => (phase, None),

            (DragPhase::Dragging(mut s), DragEvent::Move { source, pointer }) => {
                if source != s.source {
                    return (DragPhase::Dragging(s), None);
                }
                s.last_pointer = pointer;
                s.moved = true;
                let intent = match s.origin {
                    DragOrigin::Canvas => Some(DragIntent::MoveTo {
                        element: s.element,
                        position: pointer - s.grab_offset,
                    }),
                    // templates stay put until dropped
                    DragOrigin::Supply(_) => None,
                };
                (DragPhase::Dragging(s), intent)
            }

            (
                DragPhase::Dragging(s),
                DragEvent::Drop {
                    source,
                    pointer,
                    target,
                },
            ) => {
                if source != s.source {
                    return (DragPhase::Dragging(s), None);
                }
                let intent = match (s.origin, target) {
                    (DragOrigin::Supply(_), DropTarget::Canvas) => DragIntent::PlaceCopy {
                        template: s.element,
                        pointer,
                    },
                    (DragOrigin::Supply(_), _) => DragIntent::Cancel { element: s.element },
                    (DragOrigin::Canvas, DropTarget::SupplyZone(_)) => {
                        DragIntent::Discard { element: s.element }
                    }
                    (DragOrigin::Canvas, _) => DragIntent::Settle { element: s.element },
                };
                (DragPhase::Idle, Some(intent))
            }

            (DragPhase::Dragging(s), DragEvent::Leave) => {
                (DragPhase::Idle, Some(DragIntent::Cancel { element: s.element }))
            }

            (DragPhase::Idle, _) => (DragPhase::Idle, None),
        }
    }
}
