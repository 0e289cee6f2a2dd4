//! The board: one explicit state struct that owns every registry and turns
//! input commands into scene updates.

use crate::attach::{AttachPoint, AttachmentManager};
use crate::background::{BackgroundCursor, BackgroundFrame};
use crate::connector::{ConnectorId, ConnectorSet, DetachError, DetachTuning, End, Endpoint, SceneView};
use crate::constants::{
    LAYOUT_MIN_BACKGROUND, LINKED_PAIR_SAG_PERCENT, MAGNET_RADIUS, PAIR_FALLBACK_WIDTH, PAIR_TOP_MARGIN,
    PAIR_VIEWPORT_FRACTION,
};
use crate::drag::{DragEvent, DragIntent, DragOrigin, DragPhase};
use crate::element::{clamp_to_canvas, scaled_size, ElementId, ElementRegistry, Zone};
use crate::layout::{ImagePlacement, OverlayDescriptor};
use crate::scene::{Commands, SceneCommand};
use glam::Vec2;

/// Where the second copy of a linked pair lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PairPlacement {
    /// Below the first copy, separated by a fraction of the viewport height.
    Below { viewport_fraction: f32 },
    /// Horizontally centred at a fixed distance from the top.
    TopCenter { top: f32 },
}

impl Default for PairPlacement {
    fn default() -> Self {
        PairPlacement::Below {
            viewport_fraction: PAIR_VIEWPORT_FRACTION,
        }
    }
}

impl PairPlacement {
    pub fn top_center() -> Self {
        PairPlacement::TopCenter { top: PAIR_TOP_MARGIN }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigConfig {
    pub detach: DetachTuning,
    pub magnet_radius: f32,
    pub linked_pair_sag_percent: f32,
    pub pair_placement: PairPlacement,
    pub layout_min_background: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            detach: DetachTuning::default(),
            magnet_radius: MAGNET_RADIUS,
            linked_pair_sag_percent: LINKED_PAIR_SAG_PERCENT,
            pair_placement: PairPlacement::default(),
            layout_min_background: LAYOUT_MIN_BACKGROUND,
        }
    }
}

/// A non-interactive layout image that made it onto the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub placement: ImagePlacement,
    pub src: String,
    pub natural_size: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Canvas or background geometry changed (load, viewport resize).
    Resize {
        canvas: Vec2,
        viewport_height: f32,
        frame: BackgroundFrame,
    },
    Drag(DragEvent),
    /// A cable end marker was clicked.
    Detach {
        connector: ConnectorId,
        end: End,
        now_ms: f64,
    },
    /// Per-frame callback.
    Tick { now_ms: f64 },
    PreviousBackground,
    NextBackground,
    /// Overlay list of the current background, in document order.
    LoadLayout(Vec<OverlayDescriptor>),
    /// A layout image whose asset was found, with its measured natural size.
    PlaceOverlay {
        placement: ImagePlacement,
        src: String,
        natural_size: Vec2,
    },
}

#[derive(Debug, Default)]
pub struct AppState {
    pub config: RigConfig,
    pub background: BackgroundCursor,
    elements: ElementRegistry,
    connectors: ConnectorSet,
    attachments: AttachmentManager,
    frame: BackgroundFrame,
    canvas: Vec2,
    viewport_height: f32,
    drag: DragPhase,
    magnet: Option<(ElementId, AttachPoint)>,
    overlays: Vec<Overlay>,
}

impl AppState {
    pub fn new(config: RigConfig, background: BackgroundCursor) -> Self {
        Self {
            config,
            background,
            ..Self::default()
        }
    }

    pub fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    pub fn connectors(&self) -> &ConnectorSet {
        &self.connectors
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    pub fn frame(&self) -> &BackgroundFrame {
        &self.frame
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    pub fn drag_phase(&self) -> &DragPhase {
        &self.drag
    }

    /// Element currently highlighted by the magnet and the point it would hook onto.
    pub fn magnet_target(&self) -> Option<(ElementId, AttachPoint)> {
        self.magnet
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn layout_active(&self) -> bool {
        self.background.has_layout(self.config.layout_min_background)
    }

    pub fn add_template(
        &mut self,
        zone: Zone,
        src: impl Into<String>,
        natural_size: Vec2,
        cable_color: Option<&str>,
    ) -> ElementId {
        self.elements.add_template(zone, src, natural_size, cable_color)
    }

    pub fn dispatch(&mut self, command: Command) -> Commands {
        let mut out = Commands::new();
        match command {
            Command::Resize {
                canvas,
                viewport_height,
                frame,
            } => self.resize(canvas, viewport_height, frame, &mut out),
            Command::Drag(event) => {
                let (next, intent) = self.drag.transition(event);
                self.drag = next;
                if let Some(intent) = intent {
                    self.apply_intent(intent, &mut out);
                }
            }
            Command::Detach { connector, end, now_ms } => self.detach(connector, end, now_ms, &mut out),
            Command::Tick { now_ms } => self.tick(now_ms, &mut out),
            Command::PreviousBackground => {
                if self.background.previous() {
                    self.switch_background(&mut out);
                }
            }
            Command::NextBackground => {
                if self.background.next() {
                    self.switch_background(&mut out);
                }
            }
            Command::LoadLayout(overlays) => self.load_layout(&overlays, &mut out),
            Command::PlaceOverlay {
                placement,
                src,
                natural_size,
            } => {
                self.overlays.push(Overlay {
                    placement,
                    src,
                    natural_size,
                });
                let index = self.overlays.len() - 1;
                out.extend(self.overlay_command(index));
            }
        }
        out
    }

    fn apply_intent(&mut self, intent: DragIntent, out: &mut Commands) {
        match intent {
            DragIntent::Began { element, origin } => {
                log::debug!("[drag] start {} from {:?}", element, origin);
                if origin == DragOrigin::Canvas {
                    self.settle_falls_for(element, out);
                    for c in self.connectors.iter_mut() {
                        c.unhook(element);
                    }
                }
            }
            DragIntent::MoveTo { element, position } => self.move_element(element, position, out),
            DragIntent::PlaceCopy { template, pointer } => self.place_copy(template, pointer, out),
            DragIntent::Settle { element } => self.settle(element, out),
            DragIntent::Discard { element } => self.remove_element(element, out),
            DragIntent::Cancel { element } => {
                log::debug!("[drag] cancelled {}", element);
                self.clear_magnet(out);
            }
        }
    }

    fn resize(&mut self, canvas: Vec2, viewport_height: f32, frame: BackgroundFrame, out: &mut Commands) {
        self.canvas = canvas.max(Vec2::ZERO);
        self.viewport_height = viewport_height.max(0.0);
        self.frame = frame;
        let scale = frame.scale();
        log::info!(
            "[scale] canvas {:.0}x{:.0}, background scale {:.3}",
            self.canvas.x,
            self.canvas.y,
            scale
        );

        let ids: Vec<ElementId> = self.elements.instances().map(|e| e.id).collect();
        for id in ids {
            if let Some(e) = self.elements.get_mut(id) {
                e.size = scaled_size(e.natural_size, scale, self.canvas);
                out.push(SceneCommand::ResizeElement { id, size: e.size });
            }
        }

        let view = SceneView {
            elements: &self.elements,
            frame: &self.frame,
        };
        for c in self.connectors.iter_mut() {
            if c.recompute(&view).is_some() {
                out.extend(SceneCommand::draw(c));
            }
        }

        out.push(SceneCommand::ClearOverlays);
        for index in 0..self.overlays.len() {
            out.extend(self.overlay_command(index));
        }
        self.refresh_attach_points();
    }

    fn overlay_command(&self, index: usize) -> Option<SceneCommand> {
        let o = self.overlays.get(index)?;
        let position = self
            .frame
            .percent_to_canvas(Vec2::new(o.placement.x, o.placement.y));
        Some(SceneCommand::PlaceOverlay {
            index,
            src: o.src.clone(),
            position,
            size: o.natural_size * self.frame.scale(),
            rotation_deg: o.placement.rotation,
        })
    }

    fn move_element(&mut self, id: ElementId, position: Vec2, out: &mut Commands) {
        let Some(el) = self.elements.get(id).filter(|e| e.is_instance()) else {
            return;
        };
        let zone = el.zone;
        let clamped = clamp_to_canvas(position, el.size, self.canvas);
        self.elements.set_position(id, clamped);
        out.push(SceneCommand::MoveElement { id, position: clamped });

        let children = self.attachments.propagate_move(id, &mut self.elements);
        for child in &children {
            if let Some(c) = self.elements.get(*child) {
                out.push(SceneCommand::MoveElement {
                    id: *child,
                    position: c.position,
                });
            }
        }

        let mut touched = children;
        touched.push(id);
        self.redraw_connectors_for(&touched, out);

        if zone.is_linked_pair() {
            self.update_magnet(id, out);
        }
    }

    fn redraw_connectors_for(&mut self, ids: &[ElementId], out: &mut Commands) {
        let view = SceneView {
            elements: &self.elements,
            frame: &self.frame,
        };
        for c in self.connectors.iter_mut() {
            if ids.iter().any(|id| c.references(*id)) && c.recompute(&view).is_some() {
                out.extend(SceneCommand::draw(c));
            }
        }
    }

    fn update_magnet(&mut self, id: ElementId, out: &mut Commands) {
        let Some(center) = self.elements.center_of(id) else {
            return;
        };
        let hit = self
            .attachments
            .find_nearby_attach_point(center, self.config.magnet_radius);
        match (self.magnet, hit) {
            (None, Some(_)) => out.push(SceneCommand::Highlight { id, on: true }),
            (Some((prev, _)), None) => out.push(SceneCommand::Highlight { id: prev, on: false }),
            _ => {}
        }
        self.magnet = hit.map(|ap| (id, ap));
    }

    fn clear_magnet(&mut self, out: &mut Commands) {
        if let Some((id, _)) = self.magnet.take() {
            out.push(SceneCommand::Highlight { id, on: false });
        }
    }

    fn settle(&mut self, id: ElementId, out: &mut Commands) {
        let Some(el) = self.elements.get(id) else {
            return;
        };
        let zone = el.zone;
        let size = el.size;

        if let Some((_, ap)) = self.magnet.filter(|(m, _)| *m == id) {
            let pos = clamp_to_canvas(ap.point - size * 0.5, size, self.canvas);
            self.elements.set_position(id, pos);
            out.push(SceneCommand::MoveElement { id, position: pos });
            if let Some(c) = self.connectors.get_mut(ap.connector) {
                c.hook(id);
                log::info!("[magnet] {} hooked onto {}", id, ap.connector);
            }
            self.redraw_connectors_for(&[id], out);
        }
        self.clear_magnet(out);

        if zone.is_linked_pair() {
            self.attachments.try_attach(&self.elements, id, Zone::Load);
        }
        log::debug!("[drag] {} dropped on canvas", id);
    }

    fn place_copy(&mut self, template: ElementId, pointer: Vec2, out: &mut Commands) {
        let Some(t) = self.elements.get(template).filter(|t| !t.is_instance()) else {
            return;
        };
        let zone = t.zone;
        let color = t.cable_color.clone();
        let size = scaled_size(t.natural_size, self.frame.scale(), self.canvas);
        let pos = clamp_to_canvas(pointer - size * 0.5, size, self.canvas);

        let Some(first) = self.elements.instantiate(template, pos, size) else {
            return;
        };
        if let Some(e) = self.elements.get(first) {
            out.push(SceneCommand::place(e));
        }
        log::info!("[drop] {} copied from {} at ({:.0}, {:.0})", first, template, pos.x, pos.y);

        if !zone.is_linked_pair() {
            return;
        }

        let second_pos = self.pair_position(pos, size);
        let Some(second) = self.elements.instantiate(template, second_pos, size) else {
            return;
        };
        if let Some(e) = self.elements.get(second) {
            out.push(SceneCommand::place(e));
        }

        let cable = self.connectors.create(
            format!("pair-{}-{}", first.0, second.0),
            Endpoint::element(first, true),
            Endpoint::element(second, true),
            color,
            self.config.linked_pair_sag_percent,
        );
        let view = SceneView {
            elements: &self.elements,
            frame: &self.frame,
        };
        if let Some(c) = self.connectors.get_mut(cable) {
            if c.recompute(&view).is_some() {
                out.extend(SceneCommand::draw(c));
            }
        }
        log::info!("[drop] linked pair {} + {} joined by {}", first, second, cable);

        for id in [first, second] {
            self.attachments.try_attach(&self.elements, id, Zone::Load);
        }
    }

    fn pair_position(&self, first: Vec2, size: Vec2) -> Vec2 {
        let pos = match self.config.pair_placement {
            PairPlacement::Below { viewport_fraction } => {
                Vec2::new(first.x, first.y + size.y + self.viewport_height * viewport_fraction)
            }
            PairPlacement::TopCenter { top } => {
                let width = if size.x > 0.0 { size.x } else { PAIR_FALLBACK_WIDTH };
                Vec2::new((self.canvas.x - width) / 2.0, top)
            }
        };
        clamp_to_canvas(pos, size, self.canvas)
    }

    fn remove_element(&mut self, id: ElementId, out: &mut Commands) {
        if !self.elements.get(id).is_some_and(|e| e.is_instance()) {
            return;
        }
        self.clear_magnet(out);
        for cable in self.connectors.remove_referencing(id) {
            out.push(SceneCommand::RemoveConnector { id: cable });
        }
        for c in self.connectors.iter_mut() {
            c.unhook(id);
        }
        let released = self.attachments.children_of(id);
        self.attachments.forget(id);
        self.elements.remove(id);
        out.push(SceneCommand::RemoveElement { id });
        self.refresh_attach_points();
        log::info!("[drop] {} returned to its zone ({} children released)", id, released.len());
    }

    /// Finish falls on cables bound to or hooked by `element` before it moves.
    fn settle_falls_for(&mut self, element: ElementId, out: &mut Commands) {
        let view = SceneView {
            elements: &self.elements,
            frame: &self.frame,
        };
        for c in self.connectors.iter_mut() {
            let involved = c.references(element) || c.hooked() == Some(element);
            if c.is_falling() && involved && c.settle_fall(&view).is_some() {
                log::debug!("[detach] {} fall settled by drag of {}", c.id, element);
                out.extend(SceneCommand::draw(c));
            }
        }
    }

    fn detach(&mut self, connector: ConnectorId, end: End, now_ms: f64, out: &mut Commands) {
        let candidates: Vec<Vec2> = self
            .elements
            .instances_in_zone(Zone::Linked)
            .map(|e| e.center())
            .collect();
        let tuning = self.config.detach;
        let view = SceneView {
            elements: &self.elements,
            frame: &self.frame,
        };
        let Some(c) = self.connectors.get_mut(connector) else {
            log::debug!("[detach] {}", DetachError::UnknownConnector(connector));
            return;
        };
        match c.begin_detach(end, &candidates, &view, &tuning, now_ms) {
            Ok(_) => {
                if c.step_fall(now_ms, &view).is_some() {
                    out.extend(SceneCommand::draw(c));
                }
            }
            Err(e) => {
                log::debug!("[detach] {} {} refused: {}", connector, end.as_str(), e);
                return;
            }
        }
        self.refresh_attach_points();
    }

    fn tick(&mut self, now_ms: f64, out: &mut Commands) {
        let view = SceneView {
            elements: &self.elements,
            frame: &self.frame,
        };
        for c in self.connectors.iter_mut() {
            if c.is_falling() && c.step_fall(now_ms, &view).is_some() {
                out.extend(SceneCommand::draw(c));
            }
        }
    }

    pub fn any_falling(&self) -> bool {
        self.connectors.any_falling()
    }

    fn switch_background(&mut self, out: &mut Commands) {
        self.clear_layout(out);
        out.push(SceneCommand::ShowBackground {
            index: self.background.current,
            src: self.background.image_path(),
        });
        log::info!("[background] switched to {}", self.background.current);
    }

    fn clear_layout(&mut self, out: &mut Commands) {
        for id in self.connectors.remove_layout_connectors() {
            out.push(SceneCommand::RemoveConnector { id });
        }
        if !self.overlays.is_empty() {
            self.overlays.clear();
            out.push(SceneCommand::ClearOverlays);
        }
        self.refresh_attach_points();
    }

    /// Replace the layout cables with those described in `overlays`.
    ///
    /// Image placements are only counted here; the host places each one with
    /// [`Command::PlaceOverlay`] once its asset has been found and measured.
    fn load_layout(&mut self, overlays: &[OverlayDescriptor], out: &mut Commands) {
        self.clear_layout(out);
        if !self.layout_active() {
            log::debug!("[layout] background {} has no layout", self.background.current);
            return;
        }

        let mut images = 0;
        for descriptor in overlays {
            let spec = match descriptor {
                OverlayDescriptor::Connector(spec) => spec,
                OverlayDescriptor::Image(_) => {
                    images += 1;
                    continue;
                }
            };
            let id = self.connectors.create(
                spec.name.clone(),
                Endpoint::background(Vec2::new(spec.x1, spec.y1), spec.fixed),
                Endpoint::background(Vec2::new(spec.x2, spec.y2), spec.fixed),
                spec.color.clone(),
                spec.sag_percent,
            );
            let view = SceneView {
                elements: &self.elements,
                frame: &self.frame,
            };
            if let Some(c) = self.connectors.get_mut(id) {
                c.from_layout = true;
                if c.recompute(&view).is_some() {
                    out.extend(SceneCommand::draw(c));
                }
            }
        }
        self.refresh_attach_points();
        log::info!(
            "[layout] background {}: {} cables, {} images",
            self.background.current,
            self.connectors.iter().filter(|c| c.from_layout).count(),
            images
        );
    }

    fn refresh_attach_points(&mut self) {
        let points = self
            .connectors
            .iter()
            .filter(|c| c.from_layout)
            .filter_map(|c| {
                c.attach_point().map(|point| AttachPoint {
                    connector: c.id,
                    point,
                })
            })
            .collect();
        self.attachments.set_attach_points(points);
    }
}
