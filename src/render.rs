use crate::constants::*;
use crate::dom;
use crate::input;
use fnv::FnvHashMap;
use glam::Vec2;
use rigging_core::{ConnectorId, ElementId, SceneCommand};
use wasm_bindgen::JsCast;
use web_sys as web;

struct CableNodes {
    path: web::Element,
    markers: [web::Element; 2],
}

/// DOM side of the board: placed images, the cable layer and layout overlays.
pub struct Scene {
    document: web::Document,
    board: web::HtmlElement,
    background: web::HtmlImageElement,
    cable_layer: web::Element,
    elements: FnvHashMap<ElementId, web::HtmlElement>,
    cables: FnvHashMap<ConnectorId, CableNodes>,
    overlays: Vec<web::HtmlElement>,
}

impl Scene {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let board = dom::html_by_id(document, BOARD_ID)?;
        let background = dom::html_by_id(document, BACKGROUND_IMG_ID)?
            .dyn_into::<web::HtmlImageElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        let cable_layer =
            dom::create_svg(document, "svg").ok_or_else(|| anyhow::anyhow!("cannot create cable layer"))?;
        _ = cable_layer.set_attribute(
            "style",
            &format!(
                "position:absolute;left:0;top:0;width:100%;height:100%;overflow:visible;pointer-events:none;z-index:{}",
                Z_CABLES
            ),
        );
        _ = board.append_child(&cable_layer);

        Ok(Self {
            document: document.clone(),
            board,
            background,
            cable_layer,
            elements: FnvHashMap::default(),
            cables: FnvHashMap::default(),
            overlays: Vec::new(),
        })
    }

    pub fn board(&self) -> &web::HtmlElement {
        &self.board
    }

    pub fn background(&self) -> &web::HtmlImageElement {
        &self.background
    }

    /// Where the background image is drawn inside the board.
    pub fn background_rect(&self) -> (Vec2, Vec2) {
        let board = dom::screen_rect(&self.board);
        let bg = dom::screen_rect(&self.background);
        (bg.origin() - board.origin(), bg.size())
    }

    pub fn apply_all(&mut self, commands: &[SceneCommand]) {
        for c in commands {
            self.apply(c);
        }
    }

    pub fn apply(&mut self, command: &SceneCommand) {
        match command {
            SceneCommand::PlaceElement {
                id,
                src,
                position,
                size,
            } => self.place_element(*id, src, *position, *size),
            SceneCommand::MoveElement { id, position } => {
                if let Some(el) = self.elements.get(id) {
                    dom::set_box(el, *position, None);
                }
            }
            SceneCommand::ResizeElement { id, size } => {
                if let Some(el) = self.elements.get(id) {
                    let style = el.style();
                    _ = style.set_property("width", &input::px(size.x));
                    _ = style.set_property("height", &input::px(size.y));
                }
            }
            SceneCommand::RemoveElement { id } => {
                if let Some(el) = self.elements.remove(id) {
                    el.remove();
                }
            }
            SceneCommand::Highlight { id, on } => {
                if let Some(el) = self.elements.get(id) {
                    _ = el.class_list().toggle_with_force(HIGHLIGHT_CLASS, *on);
                }
            }
            SceneCommand::PlaceOverlay {
                index,
                src,
                position,
                size,
                rotation_deg,
            } => self.place_overlay(*index, src, *position, *size, *rotation_deg),
            SceneCommand::ClearOverlays => {
                for el in self.overlays.drain(..) {
                    el.remove();
                }
            }
            SceneCommand::DrawConnector {
                id,
                color,
                path,
                start_marker,
                end_marker,
                releasable,
            } => self.draw_cable(*id, color, path, [*start_marker, *end_marker], *releasable),
            SceneCommand::RemoveConnector { id } => {
                if let Some(nodes) = self.cables.remove(id) {
                    nodes.path.remove();
                    for m in nodes.markers {
                        m.remove();
                    }
                }
            }
            SceneCommand::ShowBackground { src, .. } => self.background.set_src(src),
        }
    }

    pub fn set_dragging(&self, id: ElementId, on: bool) {
        if let Some(el) = self.elements.get(&id) {
            _ = el.class_list().toggle_with_force(DRAGGING_CLASS, on);
            let z = if on { Z_DRAGGING } else { Z_ELEMENT };
            _ = el.style().set_property("z-index", &z.to_string());
        }
    }

    fn place_element(&mut self, id: ElementId, src: &str, position: Vec2, size: Vec2) {
        let Some(el) = dom::create_html(&self.document, "img") else {
            log::warn!("[render] cannot create node for {}", id);
            return;
        };
        _ = el.set_attribute("src", src);
        _ = el.set_attribute(ATTR_ELEMENT_ID, &id.0.to_string());
        _ = el.set_attribute("draggable", "false");
        _ = el.class_list().add_1(PLACED_CLASS);
        let style = el.style();
        _ = style.set_property("position", "absolute");
        _ = style.set_property("z-index", &Z_ELEMENT.to_string());
        _ = style.set_property("touch-action", "none");
        dom::set_box(&el, position, Some(size));
        _ = self.board.append_child(&el);
        self.elements.insert(id, el);
    }

    fn place_overlay(&mut self, index: usize, src: &str, position: Vec2, size: Vec2, rotation: Option<f32>) {
        let Some(el) = dom::create_html(&self.document, "img") else {
            return;
        };
        _ = el.set_attribute("src", src);
        _ = el.class_list().add_1(OVERLAY_CLASS);
        let style = el.style();
        _ = style.set_property("position", "absolute");
        _ = style.set_property("pointer-events", "none");
        _ = style.set_property("z-index", &Z_OVERLAY.to_string());
        dom::set_box(&el, position, Some(size));
        if let Some(deg) = rotation {
            _ = style.set_property("transform", &format!("rotate({}deg)", deg));
        }
        _ = self.board.append_child(&el);
        if index < self.overlays.len() {
            let old = std::mem::replace(&mut self.overlays[index], el);
            old.remove();
        } else {
            self.overlays.push(el);
        }
    }

    fn draw_cable(&mut self, id: ConnectorId, color: &str, path: &str, ends: [Vec2; 2], releasable: [bool; 2]) {
        if !self.cables.contains_key(&id) {
            let Some(nodes) = self.create_cable(id) else {
                log::warn!("[render] cannot create nodes for {}", id);
                return;
            };
            self.cables.insert(id, nodes);
        }
        let Some(nodes) = self.cables.get(&id) else {
            return;
        };
        _ = nodes.path.set_attribute("d", path);
        _ = nodes.path.set_attribute("stroke", color);
        for ((marker, at), can_release) in nodes.markers.iter().zip(ends).zip(releasable) {
            _ = marker.set_attribute("cx", &format!("{:.2}", at.x));
            _ = marker.set_attribute("cy", &format!("{:.2}", at.y));
            _ = marker.set_attribute("fill", color);
            _ = marker.class_list().toggle_with_force(RELEASABLE_CLASS, can_release);
            let events = if can_release { "auto" } else { "none" };
            _ = marker.set_attribute("style", &format!("pointer-events:{};cursor:pointer", events));
        }
    }

    fn create_cable(&self, id: ConnectorId) -> Option<CableNodes> {
        let path = dom::create_svg(&self.document, "path")?;
        _ = path.set_attribute("fill", "none");
        _ = path.set_attribute("stroke-width", &CABLE_STROKE_WIDTH.to_string());
        _ = path.set_attribute("stroke-linecap", "round");
        _ = self.cable_layer.append_child(&path);

        let marker = |end: &str| -> Option<web::Element> {
            let c = dom::create_svg(&self.document, "circle")?;
            _ = c.set_attribute("r", &MARKER_RADIUS.to_string());
            _ = c.set_attribute(ATTR_CONNECTOR_ID, &id.0.to_string());
            _ = c.set_attribute(ATTR_END, end);
            _ = c.class_list().add_1(MARKER_CLASS);
            _ = self.cable_layer.append_child(&c);
            Some(c)
        };
        let start = marker("start")?;
        let end = marker("end")?;
        Some(CableNodes {
            path,
            markers: [start, end],
        })
    }
}
