//! Cables between two endpoints, their sagging curve, and the release of one
//! end into a fall.

use crate::background::BackgroundFrame;
use crate::constants::{CURVE_SAMPLE_COUNT, DETACH_CAPTURE_RADIUS, FALL_DURATION_MS};
use crate::element::{ElementId, ElementRegistry};
use crate::fall::FallAnimation;
use crate::geometry::{nearest_point_on_curve, CurveHit, QuadCurve, SagSpan};
use glam::Vec2;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub u32);

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cable#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum End {
    Start,
    End,
}

impl End {
    pub fn other(self) -> End {
        match self {
            End::Start => End::End,
            End::End => End::Start,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            End::Start => "start",
            End::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<End> {
        match s {
            "start" => Some(End::Start),
            "end" => Some(End::End),
            _ => None,
        }
    }
}

/// What an endpoint is pinned to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EndpointSource {
    /// Centre of a placed element, read live on every recompute.
    Element(ElementId),
    /// Percentage coordinate on the background image.
    Background(Vec2),
    /// Free canvas point; used by a released end while it falls and after it lands.
    Floating(Vec2),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoint {
    pub source: EndpointSource,
    /// Fixed endpoints can never be released.
    pub fixed: bool,
}

impl Endpoint {
    pub fn element(id: ElementId, fixed: bool) -> Self {
        Self {
            source: EndpointSource::Element(id),
            fixed,
        }
    }

    pub fn background(percent: Vec2, fixed: bool) -> Self {
        Self {
            source: EndpointSource::Background(percent),
            fixed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetachState {
    Attached,
    DetachingStart,
    DetachingEnd,
}

impl DetachState {
    pub fn released_end(self) -> Option<End> {
        match self {
            DetachState::Attached => None,
            DetachState::DetachingStart => Some(End::Start),
            DetachState::DetachingEnd => Some(End::End),
        }
    }

    fn releasing(end: End) -> Self {
        match end {
            End::Start => DetachState::DetachingStart,
            End::End => DetachState::DetachingEnd,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetachError {
    #[error("{0} is not on the board")]
    UnknownConnector(ConnectorId),
    #[error("the {0} end is fixed")]
    FixedEndpoint(&'static str),
    #[error("cable is already released")]
    AlreadyDetaching,
    #[error("an endpoint refers to an element that no longer exists")]
    StaleEndpoint,
}

fn resolve_source(source: EndpointSource, resolver: &impl AnchorResolver) -> Option<Vec2> {
    match source {
        EndpointSource::Element(id) => resolver.element_center(id),
        EndpointSource::Background(percent) => Some(resolver.background_point(percent)),
        EndpointSource::Floating(p) => Some(p),
    }
}

/// Live lookups a connector needs to place its endpoints.
pub trait AnchorResolver {
    fn element_center(&self, id: ElementId) -> Option<Vec2>;
    fn background_point(&self, percent: Vec2) -> Vec2;
}

/// Resolver over the element registry and the current background frame.
pub struct SceneView<'a> {
    pub elements: &'a ElementRegistry,
    pub frame: &'a BackgroundFrame,
}

impl AnchorResolver for SceneView<'_> {
    fn element_center(&self, id: ElementId) -> Option<Vec2> {
        self.elements.center_of(id)
    }

    fn background_point(&self, percent: Vec2) -> Vec2 {
        self.frame.percent_to_canvas(percent)
    }
}

/// Everything needed to draw a cable: the path and its two end markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorGeometry {
    pub curve: QuadCurve,
    pub start_marker: Vec2,
    pub end_marker: Vec2,
}

impl ConnectorGeometry {
    pub fn path_data(&self) -> String {
        self.curve.to_svg_path()
    }
}

/// Radii and timing applied when a cable end is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetachTuning {
    pub capture_radius: f32,
    pub sample_count: usize,
    pub fall_duration_ms: f64,
}

impl Default for DetachTuning {
    fn default() -> Self {
        Self {
            capture_radius: DETACH_CAPTURE_RADIUS,
            sample_count: CURVE_SAMPLE_COUNT,
            fall_duration_ms: FALL_DURATION_MS,
        }
    }
}

/// Where a release ended up anchoring and how far the end will drop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetachPlan {
    pub anchor: Vec2,
    pub from: Vec2,
    pub cable_length: f32,
    /// Set when the anchor is a snap onto a nearby element.
    pub snap: Option<CurveHit>,
}

/// Where a released cable hangs from, kept in a form that can be resolved
/// again when the board is rescaled.
#[derive(Clone, Copy, Debug, PartialEq)]
enum HangAnchor {
    /// The end that stayed attached.
    Held,
    /// The point at parameter `t` of the intact curve, where gear caught it.
    OnCurve(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Release {
    end: End,
    /// What the released end was pinned to before it let go.
    origin: EndpointSource,
    anchor: HangAnchor,
    /// Hanging length over the straight distance between the two pins.
    length_ratio: f32,
}

#[derive(Clone, Debug)]
pub struct Connector {
    pub id: ConnectorId,
    pub name: String,
    pub color: String,
    pub sag_percent: f32,
    pub start: Endpoint,
    pub end: Endpoint,
    /// Created from a background layout rather than by the user.
    pub from_layout: bool,
    state: DetachState,
    fall: Option<FallAnimation>,
    release: Option<Release>,
    hooked: Option<ElementId>,
    geometry: Option<ConnectorGeometry>,
}

impl Connector {
    pub fn new(
        id: ConnectorId,
        name: impl Into<String>,
        start: Endpoint,
        end: Endpoint,
        color: impl Into<String>,
        sag_percent: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            sag_percent,
            start,
            end,
            from_layout: false,
            state: DetachState::Attached,
            fall: None,
            release: None,
            hooked: None,
            geometry: None,
        }
    }

    pub fn state(&self) -> DetachState {
        self.state
    }

    pub fn endpoint(&self, end: End) -> &Endpoint {
        match end {
            End::Start => &self.start,
            End::End => &self.end,
        }
    }

    fn endpoint_mut(&mut self, end: End) -> &mut Endpoint {
        match end {
            End::Start => &mut self.start,
            End::End => &mut self.end,
        }
    }

    pub fn fall(&self) -> Option<&FallAnimation> {
        self.fall.as_ref()
    }

    pub fn is_falling(&self) -> bool {
        self.fall.as_ref().is_some_and(FallAnimation::is_running)
    }

    pub fn geometry(&self) -> Option<&ConnectorGeometry> {
        self.geometry.as_ref()
    }

    pub fn hooked(&self) -> Option<ElementId> {
        self.hooked
    }

    pub fn hook(&mut self, element: ElementId) {
        self.hooked = Some(element);
    }

    pub fn unhook(&mut self, element: ElementId) -> bool {
        if self.hooked == Some(element) {
            self.hooked = None;
            true
        } else {
            false
        }
    }

    pub fn references(&self, element: ElementId) -> bool {
        [self.start.source, self.end.source]
            .iter()
            .any(|s| matches!(s, EndpointSource::Element(e) if *e == element))
    }

    pub fn is_detachable(&self, end: End) -> bool {
        !self.endpoint(end).fixed && self.state == DetachState::Attached
    }

    pub fn resolve(&self, end: End, resolver: &impl AnchorResolver) -> Option<Vec2> {
        resolve_source(self.endpoint(end).source, resolver)
    }

    /// What `end` is pinned to, looking through a release to the original pin.
    fn pin(&self, end: End) -> EndpointSource {
        match self.release {
            Some(r) if r.end == end => r.origin,
            _ => self.endpoint(end).source,
        }
    }

    /// Cables bound to gear sag by their straight span, layout cables by
    /// their horizontal span.
    pub fn sag_span(&self) -> SagSpan {
        let bound = [End::Start, End::End]
            .into_iter()
            .any(|e| matches!(self.pin(e), EndpointSource::Element(_)));
        if bound {
            SagSpan::Direct
        } else {
            SagSpan::Horizontal
        }
    }

    fn intact_curve(&self, a: Vec2, b: Vec2) -> QuadCurve {
        QuadCurve::with_sag(a, b, self.sag_percent, self.sag_span())
    }

    /// Anchor and hanging length of a released cable from the live pins.
    /// `None` once the pin the end let go of no longer resolves.
    fn hang(&self, release: &Release, held: Vec2, resolver: &impl AnchorResolver) -> Option<(Vec2, Vec2, f32)> {
        let from = resolve_source(release.origin, resolver)?;
        let (a, b) = match release.end {
            End::Start => (from, held),
            End::End => (held, from),
        };
        let anchor = match release.anchor {
            HangAnchor::Held => held,
            HangAnchor::OnCurve(t) => self.intact_curve(a, b).point_at(t),
        };
        Some((anchor, from, release.length_ratio * a.distance(b)))
    }

    /// Rebuild the curve and markers from the live endpoint positions.
    ///
    /// A released cable is re-hung from its resolved anchor, keeping the
    /// progress of its fall. Returns `None` and keeps the previous geometry
    /// when an endpoint refers to an element that has been removed.
    pub fn recompute(&mut self, resolver: &impl AnchorResolver) -> Option<ConnectorGeometry> {
        let geometry = match (self.release, self.fall.is_some()) {
            (Some(release), true) => {
                let held = self.resolve(release.end.other(), resolver)?;
                let hang = self.hang(&release, held, resolver);
                let fall = self.fall.as_mut()?;
                if let Some((anchor, from, length)) = hang {
                    fall.rebase(anchor, from, length);
                }
                let frame = fall.current_frame();
                self.endpoint_mut(release.end).source = EndpointSource::Floating(frame.falling);
                Self::markers(release.end, frame.curve, held, frame.falling)
            }
            _ => {
                let a = self.resolve(End::Start, resolver)?;
                let b = self.resolve(End::End, resolver)?;
                ConnectorGeometry {
                    curve: self.intact_curve(a, b),
                    start_marker: a,
                    end_marker: b,
                }
            }
        };
        self.geometry = Some(geometry);
        Some(geometry)
    }

    fn markers(released: End, curve: QuadCurve, held: Vec2, falling: Vec2) -> ConnectorGeometry {
        let (start_marker, end_marker) = match released {
            End::Start => (falling, held),
            End::End => (held, falling),
        };
        ConnectorGeometry {
            curve,
            start_marker,
            end_marker,
        }
    }

    /// Release `which` end and start its fall.
    ///
    /// The end snaps onto the closest of `snap_candidates` lying within
    /// the capture radius of the sampled curve; without one it hangs from the
    /// other endpoint. Refused for fixed ends and for a cable that is already
    /// released.
    pub fn begin_detach(
        &mut self,
        which: End,
        snap_candidates: &[Vec2],
        resolver: &impl AnchorResolver,
        tuning: &DetachTuning,
        now_ms: f64,
    ) -> Result<DetachPlan, DetachError> {
        if self.endpoint(which).fixed {
            return Err(DetachError::FixedEndpoint(which.as_str()));
        }
        if self.state != DetachState::Attached {
            return Err(DetachError::AlreadyDetaching);
        }
        let from = self.resolve(which, resolver).ok_or(DetachError::StaleEndpoint)?;
        let held = self
            .resolve(which.other(), resolver)
            .ok_or(DetachError::StaleEndpoint)?;
        let (a, b) = match which {
            End::Start => (from, held),
            End::End => (held, from),
        };
        let curve = self.intact_curve(a, b);

        let mut snap: Option<CurveHit> = None;
        for candidate in snap_candidates {
            let hit = nearest_point_on_curve(&curve, *candidate, tuning.sample_count);
            if hit.distance < tuning.capture_radius && snap.map_or(true, |s| hit.distance < s.distance) {
                snap = Some(hit);
            }
        }
        let anchor = snap.map_or(held, |s| s.point);
        let cable_length = from.distance(anchor);
        let span = a.distance(b);
        let release = Release {
            end: which,
            origin: self.endpoint(which).source,
            anchor: snap.map_or(HangAnchor::Held, |s| HangAnchor::OnCurve(s.t)),
            length_ratio: if span > f32::EPSILON { cable_length / span } else { 0.0 },
        };

        let mut fall = FallAnimation::new(anchor, from, cable_length).with_duration(tuning.fall_duration_ms);
        fall.start(now_ms);
        self.fall = Some(fall);
        self.release = Some(release);
        self.endpoint_mut(which).source = EndpointSource::Floating(from);
        self.state = DetachState::releasing(which);
        log::info!(
            "[detach] {} {} end released, anchor=({:.1},{:.1}) length={:.1} snapped={}",
            self.id,
            which.as_str(),
            anchor.x,
            anchor.y,
            cable_length,
            snap.is_some()
        );
        Ok(DetachPlan {
            anchor,
            from,
            cable_length,
            snap,
        })
    }

    /// Advance a running fall. Returns the new geometry while it moves.
    pub fn step_fall(&mut self, now_ms: f64, resolver: &impl AnchorResolver) -> Option<ConnectorGeometry> {
        let released = self.state.released_end()?;
        let frame = self.fall.as_mut()?.step(now_ms)?;
        self.endpoint_mut(released).source = EndpointSource::Floating(frame.falling);
        let held = self
            .resolve(released.other(), resolver)
            .unwrap_or(frame.curve.start);
        let geometry = Self::markers(released, frame.curve, held, frame.falling);
        self.geometry = Some(geometry);
        Some(geometry)
    }

    /// Finish a running fall immediately at its resting position.
    pub fn settle_fall(&mut self, resolver: &impl AnchorResolver) -> Option<ConnectorGeometry> {
        let released = self.state.released_end()?;
        let fall = self.fall.as_mut()?;
        if !fall.is_running() {
            return None;
        }
        let frame = fall.settle();
        self.endpoint_mut(released).source = EndpointSource::Floating(frame.falling);
        let held = self
            .resolve(released.other(), resolver)
            .unwrap_or(frame.curve.start);
        let geometry = Self::markers(released, frame.curve, held, frame.falling);
        self.geometry = Some(geometry);
        Some(geometry)
    }

    /// Drop point offered to dragged gear: the apex of an intact, releasable cable.
    pub fn attach_point(&self) -> Option<Vec2> {
        if self.state != DetachState::Attached || (self.start.fixed && self.end.fixed) {
            return None;
        }
        self.geometry.map(|g| g.curve.point_at(0.5))
    }
}

/// Every cable on the board, in creation order.
#[derive(Debug, Default)]
pub struct ConnectorSet {
    connectors: Vec<Connector>,
    next_id: u32,
}

impl ConnectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        name: impl Into<String>,
        start: Endpoint,
        end: Endpoint,
        color: impl Into<String>,
        sag_percent: f32,
    ) -> ConnectorId {
        self.next_id += 1;
        let id = ConnectorId(self.next_id);
        self.connectors
            .push(Connector::new(id, name, start, end, color, sag_percent));
        id
    }

    pub fn get(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: ConnectorId) -> Option<&mut Connector> {
        self.connectors.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Connector> {
        self.connectors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn remove(&mut self, id: ConnectorId) -> Option<Connector> {
        let idx = self.connectors.iter().position(|c| c.id == id)?;
        Some(self.connectors.remove(idx))
    }

    pub fn referencing(&self, element: ElementId) -> Vec<ConnectorId> {
        self.connectors
            .iter()
            .filter(|c| c.references(element))
            .map(|c| c.id)
            .collect()
    }

    /// Remove every cable bound to `element` and return their ids.
    pub fn remove_referencing(&mut self, element: ElementId) -> Vec<ConnectorId> {
        let ids = self.referencing(element);
        self.connectors.retain(|c| !c.references(element));
        ids
    }

    pub fn remove_layout_connectors(&mut self) -> Vec<ConnectorId> {
        let ids = self
            .connectors
            .iter()
            .filter(|c| c.from_layout)
            .map(|c| c.id)
            .collect();
        self.connectors.retain(|c| !c.from_layout);
        ids
    }

    pub fn any_falling(&self) -> bool {
        self.connectors.iter().any(Connector::is_falling)
    }
}
