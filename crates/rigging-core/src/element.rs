//! Placeable equipment tokens: supply-zone templates and their canvas copies.

use crate::constants::{DEFAULT_CABLE_COLOR, FIT_MARGIN};
use crate::geometry::Rect;
use fnv::FnvHashMap;
use glam::Vec2;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Supply zone an element was created from. The zone decides how its copies behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Loads and structures; other elements may ride on top of them.
    Load,
    /// Slinging gear. Dropping one creates a cabled pair, and a copy attaches
    /// to whichever load it is released over.
    Linked,
    /// Loose accessories with no special behaviour.
    Accessory,
}

impl Zone {
    /// 1-based number used by the page markup (`data-zone="2"`).
    pub fn number(self) -> u8 {
        match self {
            Zone::Load => 1,
            Zone::Linked => 2,
            Zone::Accessory => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Zone> {
        match n {
            1 => Some(Zone::Load),
            2 => Some(Zone::Linked),
            3 => Some(Zone::Accessory),
            _ => None,
        }
    }

    pub fn is_linked_pair(self) -> bool {
        matches!(self, Zone::Linked)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Template,
    Instance,
}

#[derive(Clone, Debug)]
pub struct Element {
    pub id: ElementId,
    pub zone: Zone,
    pub kind: ElementKind,
    /// Asset path the front-end renders.
    pub src: String,
    pub natural_size: Vec2,
    /// Rendered size on the canvas; zero for templates that were never placed.
    pub size: Vec2,
    /// Top-left corner in canvas space.
    pub position: Vec2,
    pub cable_color: String,
}

impl Element {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn is_instance(&self) -> bool {
        self.kind == ElementKind::Instance
    }
}

/// Rendered size of an element: natural size times the background scale,
/// shrunk to fit the canvas with a small margin when it would overflow.
pub fn scaled_size(natural: Vec2, scale: f32, canvas: Vec2) -> Vec2 {
    let scaled = natural * scale;
    if canvas.x <= 0.0 || canvas.y <= 0.0 || scaled.x <= 0.0 || scaled.y <= 0.0 {
        return scaled.max(Vec2::ZERO);
    }
    if scaled.x > canvas.x || scaled.y > canvas.y {
        let ratio = (canvas.x / scaled.x).min(canvas.y / scaled.y) * FIT_MARGIN;
        log::debug!("[place] shrinking element by {:.1}%", ratio * 100.0);
        scaled * ratio
    } else {
        scaled
    }
}

/// Keep a box of `size` inside `[0, canvas - size]` on both axes.
pub fn clamp_to_canvas(pos: Vec2, size: Vec2, canvas: Vec2) -> Vec2 {
    let max = (canvas - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}

/// Owns every element. Iteration follows creation order, which is the
/// enumeration order used for first-match attachment.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: FnvHashMap<ElementId, Element>,
    order: Vec<ElementId>,
    next_id: u32,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.order.push(id);
        self.elements.insert(id, element);
        id
    }

    pub fn add_template(
        &mut self,
        zone: Zone,
        src: impl Into<String>,
        natural_size: Vec2,
        cable_color: Option<&str>,
    ) -> ElementId {
        let id = self.allocate();
        self.insert(Element {
            id,
            zone,
            kind: ElementKind::Template,
            src: src.into(),
            natural_size,
            size: Vec2::ZERO,
            position: Vec2::ZERO,
            cable_color: cable_color.unwrap_or(DEFAULT_CABLE_COLOR).to_string(),
        })
    }

    /// Create a canvas copy of `template` with the given size and top-left corner.
    /// Returns `None` if the template is gone.
    pub fn instantiate(&mut self, template: ElementId, position: Vec2, size: Vec2) -> Option<ElementId> {
        let base = self.elements.get(&template)?.clone();
        let id = self.allocate();
        Some(self.insert(Element {
            id,
            kind: ElementKind::Instance,
            size,
            position,
            ..base
        }))
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.elements.remove(&id)?;
        self.order.retain(|e| *e != id);
        Some(removed)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Canvas copies in creation order.
    pub fn instances(&self) -> impl Iterator<Item = &Element> {
        self.iter().filter(|e| e.is_instance())
    }

    pub fn instances_in_zone(&self, zone: Zone) -> impl Iterator<Item = &Element> {
        self.instances().filter(move |e| e.zone == zone)
    }

    pub fn center_of(&self, id: ElementId) -> Option<Vec2> {
        self.get(id).map(Element::center)
    }

    /// Move an element's top-left corner. Unknown ids are ignored.
    pub fn set_position(&mut self, id: ElementId, position: Vec2) -> bool {
        match self.elements.get_mut(&id) {
            Some(e) => {
                e.position = position;
                true
            }
            None => false,
        }
    }
}
