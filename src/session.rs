use crate::assets;
use crate::constants::*;
use crate::dom;
use crate::input::{self, ScreenRect};
use crate::render::Scene;
use glam::Vec2;
use rigging_core::constants::cable_color_for_asset;
use rigging_core::{AppState, BackgroundFrame, Command, Commands, ElementId, LayoutBook, OverlayDescriptor, SceneCommand};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type Shared = Rc<RefCell<Session>>;

/// Board state plus the DOM it draws into.
pub struct Session {
    pub app: AppState,
    pub scene: Scene,
    pub document: web::Document,
    book: LayoutBook,
    background_natural: Vec2,
}

impl Session {
    pub fn new(app: AppState, scene: Scene, document: web::Document, book: LayoutBook) -> Self {
        Self {
            app,
            scene,
            document,
            book,
            background_natural: Vec2::ZERO,
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Commands {
        let commands = self.app.dispatch(command);
        self.scene.apply_all(&commands);
        commands
    }

    pub fn board_rect(&self) -> ScreenRect {
        dom::screen_rect(self.scene.board())
    }

    pub fn dragged_element(&self) -> Option<ElementId> {
        self.app.drag_phase().session().map(|s| s.element)
    }

    /// Current board and background geometry as a resize command.
    pub fn resize_command(&self) -> Command {
        let (offset, displayed) = self.scene.background_rect();
        let viewport_height = web::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32;
        Command::Resize {
            canvas: self.board_rect().size(),
            viewport_height,
            frame: BackgroundFrame::new(self.background_natural, displayed, offset),
        }
    }
}

/// Dispatch `command` and follow up on a background switch.
pub fn run(shared: &Shared, command: Command) {
    let commands = shared.borrow_mut().dispatch(command);
    if commands
        .iter()
        .any(|c| matches!(c, SceneCommand::ShowBackground { .. }))
    {
        spawn_local(load_background(shared.clone()));
    }
}

pub fn show_current_background(shared: &Shared) {
    {
        let s = shared.borrow();
        s.scene.background().set_src(&s.app.background.image_path());
    }
    spawn_local(load_background(shared.clone()));
}

/// Measure the current background, rescale the board and apply its layout.
async fn load_background(shared: Shared) {
    let (index, src) = {
        let s = shared.borrow();
        (s.app.background.current, s.app.background.image_path())
    };
    let Some(natural) = assets::natural_size(&src).await else {
        log::warn!("[background] {} is missing", src);
        return;
    };

    let overlays: Vec<OverlayDescriptor> = {
        let mut s = shared.borrow_mut();
        if s.app.background.current != index {
            return;
        }
        s.background_natural = natural;
        let resize = s.resize_command();
        s.dispatch(resize);
        let overlays = s.book.for_background(index).to_vec();
        s.dispatch(Command::LoadLayout(overlays.clone()));
        if !s.app.layout_active() {
            return;
        }
        overlays
    };

    for descriptor in overlays {
        let OverlayDescriptor::Image(placement) = descriptor else {
            continue;
        };
        let src = format!("{}/{}", OVERLAY_DIR, placement.name);
        match assets::natural_size(&src).await {
            Some(natural_size) => {
                let mut s = shared.borrow_mut();
                if s.app.background.current != index {
                    return;
                }
                s.dispatch(Command::PlaceOverlay {
                    placement,
                    src,
                    natural_size,
                });
            }
            None => log::info!("[layout] overlay {} skipped", placement.name),
        }
    }
}

/// Register every supply-zone image as a template and tag it with its id.
pub async fn register_templates(document: &web::Document, app: &mut AppState) {
    let Ok(list) = document.query_selector_all(TEMPLATE_SELECTOR) else {
        return;
    };
    for i in 0..list.length() {
        let Some(img) = list
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlImageElement>().ok())
        else {
            continue;
        };
        let zone = img
            .closest(ZONE_SELECTOR)
            .ok()
            .flatten()
            .and_then(|z| z.get_attribute(ATTR_ZONE))
            .and_then(|a| input::parse_zone(&a));
        let (Some(zone), Some(src)) = (zone, img.get_attribute("src")) else {
            continue;
        };

        let natural = if img.complete() && img.natural_width() > 0 {
            Vec2::new(img.natural_width() as f32, img.natural_height() as f32)
        } else {
            match assets::natural_size(&src).await {
                Some(n) => n,
                None => continue,
            }
        };

        let color = cable_color_for_asset(&input::asset_stem(&src));
        let id = app.add_template(zone, src.clone(), natural, Some(color));
        _ = img.set_attribute(ATTR_ELEMENT_ID, &id.0.to_string());
        _ = img.set_attribute("draggable", "false");
        _ = img.style().set_property("touch-action", "none");
        log::debug!("[zone] {} template {} from {}", zone.number(), id, src);
    }
    log::info!("[zone] {} template(s) registered", app.elements().len());
}
