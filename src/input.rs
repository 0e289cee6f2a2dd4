use glam::Vec2;
use rigging_core::{ConnectorId, DropTarget, ElementId, End, Zone};

/// A client-space rectangle as reported by `getBoundingClientRect`.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.left + self.width && p.y >= self.top && p.y <= self.top + self.height
    }
}

// ---------------- Coordinates ----------------
#[inline]
pub fn client_to_board(client: Vec2, board: &ScreenRect) -> Vec2 {
    client - board.origin()
}

/// Release target for a pointer at `client`. Supply zones win over the board
/// so that a copy dropped on a zone overlapping the board is discarded.
pub fn drop_target(client: Vec2, board: &ScreenRect, zones: &[(Zone, ScreenRect)]) -> DropTarget {
    if let Some((zone, _)) = zones.iter().find(|(_, r)| r.contains(client)) {
        return DropTarget::SupplyZone(*zone);
    }
    if board.contains(client) {
        DropTarget::Canvas
    } else {
        DropTarget::Outside
    }
}

// ---------------- Markup attributes ----------------
#[inline]
pub fn parse_zone(attr: &str) -> Option<Zone> {
    attr.trim().parse::<u8>().ok().and_then(Zone::from_number)
}

#[inline]
pub fn parse_element_id(attr: &str) -> Option<ElementId> {
    attr.trim().parse::<u32>().ok().map(ElementId)
}

#[inline]
pub fn parse_connector_id(attr: &str) -> Option<ConnectorId> {
    attr.trim().parse::<u32>().ok().map(ConnectorId)
}

#[inline]
pub fn parse_end(attr: &str) -> Option<End> {
    End::parse(attr.trim())
}

/// Mouse button 0, or a pen/touch contact which reports button 0 as well.
#[inline]
pub fn is_primary_button(button: i16) -> bool {
    button == 0
}

/// File name without directory or extension, with `%20` decoded, e.g.
/// `"img/image%20(3).png"` → `"image (3)"`.
pub fn asset_stem(src: &str) -> String {
    let file = src.rsplit('/').next().unwrap_or(src);
    let file = file.split(['?', '#']).next().unwrap_or(file);
    let stem = match file.rfind('.') {
        Some(i) if i > 0 => &file[..i],
        _ => file,
    };
    stem.replace("%20", " ")
}

/// CSS pixel value as written to an inline style.
#[inline]
pub fn px(v: f32) -> String {
    format!("{:.2}px", v)
}
