//! Draw commands emitted for the rendering surface.
//!
//! The surface only needs absolutely positioned nodes and a vector path with
//! two end markers per cable; it never reads state back from the board.

use crate::connector::{Connector, ConnectorId, End};
use crate::element::{Element, ElementId};
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    PlaceElement {
        id: ElementId,
        src: String,
        position: Vec2,
        size: Vec2,
    },
    MoveElement {
        id: ElementId,
        position: Vec2,
    },
    ResizeElement {
        id: ElementId,
        size: Vec2,
    },
    RemoveElement {
        id: ElementId,
    },
    /// Magnet feedback while gear hovers over a cable drop point.
    Highlight {
        id: ElementId,
        on: bool,
    },
    PlaceOverlay {
        index: usize,
        src: String,
        position: Vec2,
        size: Vec2,
        rotation_deg: Option<f32>,
    },
    ClearOverlays,
    DrawConnector {
        id: ConnectorId,
        color: String,
        path: String,
        start_marker: Vec2,
        end_marker: Vec2,
        /// Whether each end (start, end) can be clicked to release it.
        releasable: [bool; 2],
    },
    RemoveConnector {
        id: ConnectorId,
    },
    ShowBackground {
        index: u32,
        src: String,
    },
}

pub type Commands = SmallVec<[SceneCommand; 4]>;

impl SceneCommand {
    pub fn place(element: &Element) -> Self {
        SceneCommand::PlaceElement {
            id: element.id,
            src: element.src.clone(),
            position: element.position,
            size: element.size,
        }
    }

    /// Draw command for a cable's last computed geometry.
    pub fn draw(connector: &Connector) -> Option<Self> {
        let g = connector.geometry()?;
        Some(SceneCommand::DrawConnector {
            id: connector.id,
            color: connector.color.clone(),
            path: g.path_data(),
            start_marker: g.start_marker,
            end_marker: g.end_marker,
            releasable: [
                connector.is_detachable(End::Start),
                connector.is_detachable(End::End),
            ],
        })
    }
}
