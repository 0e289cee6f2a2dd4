//! Parent → child position following, and the magnetic drop points offered
//! by cables.

use crate::connector::ConnectorId;
use crate::element::{ElementId, ElementRegistry, Zone};
use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec2;

/// A child's link to its parent. `offset` is child minus parent top-left,
/// captured when the link was made.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    pub parent: ElementId,
    pub offset: Vec2,
}

/// Drop point published by a cable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachPoint {
    pub connector: ConnectorId,
    pub point: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached(ElementId),
    /// No parent under the child; an earlier link to this parent was dropped.
    Released(ElementId),
    Unattached,
}

#[derive(Debug, Default)]
pub struct AttachmentManager {
    links: FnvHashMap<ElementId, Attachment>,
    attach_points: Vec<AttachPoint>,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachment(&self, child: ElementId) -> Option<&Attachment> {
        self.links.get(&child)
    }

    pub fn parent_of(&self, child: ElementId) -> Option<ElementId> {
        self.links.get(&child).map(|a| a.parent)
    }

    /// Direct children of `parent`, ordered by id.
    pub fn children_of(&self, parent: ElementId) -> Vec<ElementId> {
        let mut children: Vec<ElementId> = self
            .links
            .iter()
            .filter(|(_, a)| a.parent == parent)
            .map(|(c, _)| *c)
            .collect();
        children.sort();
        children
    }

    /// True if `ancestor` appears on `element`'s parent chain.
    pub fn is_descendant(&self, element: ElementId, ancestor: ElementId) -> bool {
        let mut seen = FnvHashSet::default();
        let mut cursor = self.parent_of(element);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            if !seen.insert(p) {
                return false;
            }
            cursor = self.parent_of(p);
        }
        false
    }

    /// Attach `child` to the first canvas element of `parent_zone`, in creation
    /// order, whose box contains the child's centre.
    ///
    /// The first containing candidate wins even when a later one is closer.
    /// Candidates that are the child itself or one of its descendants are
    /// skipped. With no candidate the child's current link, if any, is dropped.
    pub fn try_attach(&mut self, elements: &ElementRegistry, child: ElementId, parent_zone: Zone) -> AttachOutcome {
        let Some(child_el) = elements.get(child) else {
            return AttachOutcome::Unattached;
        };
        let center = child_el.center();
        let child_pos = child_el.position;

        let parent = elements
            .instances_in_zone(parent_zone)
            .filter(|p| p.id != child && !self.is_descendant(p.id, child))
            .find(|p| p.bounds().contains(center));

        match parent {
            Some(p) => {
                let offset = child_pos - p.position;
                self.links.insert(
                    child,
                    Attachment {
                        parent: p.id,
                        offset,
                    },
                );
                log::info!(
                    "[attach] {} follows {} (offset {:.1}, {:.1})",
                    child,
                    p.id,
                    offset.x,
                    offset.y
                );
                AttachOutcome::Attached(p.id)
            }
            None => match self.links.remove(&child) {
                Some(old) => {
                    log::info!("[attach] {} released from {}", child, old.parent);
                    AttachOutcome::Released(old.parent)
                }
                None => AttachOutcome::Unattached,
            },
        }
    }

    /// Remove `child`'s link. No-op when it has none.
    pub fn detach(&mut self, child: ElementId) -> Option<Attachment> {
        self.links.remove(&child)
    }

    /// Unlink every direct child of `parent`.
    pub fn release_children(&mut self, parent: ElementId) -> Vec<ElementId> {
        let children = self.children_of(parent);
        for c in &children {
            self.links.remove(c);
        }
        children
    }

    /// Drop every relation that mentions `element`, as child or as parent.
    pub fn forget(&mut self, element: ElementId) {
        self.detach(element);
        self.release_children(element);
    }

    /// Re-place every descendant of `parent` from its stored offset.
    /// Returns the moved elements, parents before their children.
    pub fn propagate_move(&self, parent: ElementId, elements: &mut ElementRegistry) -> Vec<ElementId> {
        let mut moved = Vec::new();
        let mut visited = FnvHashSet::default();
        visited.insert(parent);
        let mut stack = vec![parent];
        while let Some(p) = stack.pop() {
            let Some(base) = elements.get(p).map(|e| e.position) else {
                continue;
            };
            for child in self.children_of(p) {
                let Some(link) = self.links.get(&child) else {
                    continue;
                };
                if !visited.insert(child) {
                    continue;
                }
                if elements.set_position(child, base + link.offset) {
                    moved.push(child);
                    stack.push(child);
                }
            }
        }
        moved
    }

    pub fn set_attach_points(&mut self, points: Vec<AttachPoint>) {
        self.attach_points = points;
    }

    pub fn attach_points(&self) -> &[AttachPoint] {
        &self.attach_points
    }

    /// Closest published drop point strictly within `radius` of `center`.
    pub fn find_nearby_attach_point(&self, center: Vec2, radius: f32) -> Option<AttachPoint> {
        let mut best: Option<(f32, AttachPoint)> = None;
        for ap in &self.attach_points {
            let d = ap.point.distance(center);
            if d < radius && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, *ap));
            }
        }
        best.map(|(_, ap)| ap)
    }
}
