use crate::constants::*;
use crate::dom;
use crate::input;
use crate::session::{self, Shared};
use glam::Vec2;
use rigging_core::{Command, DragEvent, DragOrigin, GestureSource};
use wasm_bindgen::JsCast;
use web_sys as web;

mod pointer;
mod touch;

pub use pointer::wire_pointer_handlers;
pub use touch::wire_touch_handlers;

pub fn wire_all(shared: &Shared, document: &web::Document) {
    wire_pointer_handlers(shared, document);
    wire_touch_handlers(shared, document);
    wire_buttons(shared, document);
    wire_resize(shared);
}

fn wire_buttons(shared: &Shared, document: &web::Document) {
    let prev = shared.clone();
    dom::add_click_listener(document, PREV_BG_BUTTON_ID, move || {
        session::run(&prev, Command::PreviousBackground);
    });
    let next = shared.clone();
    dom::add_click_listener(document, NEXT_BG_BUTTON_ID, move || {
        session::run(&next, Command::NextBackground);
    });
    dom::add_click_listener(document, RESET_BUTTON_ID, || {
        if let Some(w) = web::window() {
            _ = w.location().reload();
        }
    });
}

fn wire_resize(shared: &Shared) {
    let shared = shared.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        let mut s = shared.borrow_mut();
        let resize = s.resize_command();
        s.dispatch(resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Press on `target`: releases a cable end when it is an end marker, otherwise
/// starts dragging the element under it. Returns whether the press was used.
pub(crate) fn press(shared: &Shared, target: Option<web::EventTarget>, client: Vec2, source: GestureSource) -> bool {
    if let Some(marker) = dom::closest(target.clone(), &format!("[{}]", ATTR_CONNECTOR_ID)) {
        let connector = marker
            .get_attribute(ATTR_CONNECTOR_ID)
            .and_then(|a| input::parse_connector_id(&a));
        let end = marker.get_attribute(ATTR_END).and_then(|a| input::parse_end(&a));
        let (Some(connector), Some(end)) = (connector, end) else {
            return false;
        };
        session::run(
            shared,
            Command::Detach {
                connector,
                end,
                now_ms: instant::now(),
            },
        );
        return true;
    }

    let Some(element) = dom::closest(target.clone(), &format!("[{}]", ATTR_ELEMENT_ID))
        .and_then(|el| el.get_attribute(ATTR_ELEMENT_ID))
        .and_then(|a| input::parse_element_id(&a))
    else {
        return false;
    };
    let origin = match dom::closest(target, ZONE_SELECTOR)
        .and_then(|z| z.get_attribute(ATTR_ZONE))
        .and_then(|a| input::parse_zone(&a))
    {
        Some(zone) => DragOrigin::Supply(zone),
        None => DragOrigin::Canvas,
    };

    let mut s = shared.borrow_mut();
    let pointer = input::client_to_board(client, &s.board_rect());
    let element_pos = match origin {
        DragOrigin::Canvas => s.app.elements().get(element).map_or(pointer, |e| e.position),
        DragOrigin::Supply(_) => pointer,
    };
    s.dispatch(Command::Drag(DragEvent::Start {
        element,
        origin,
        source,
        pointer,
        element_pos,
    }));
    if origin == DragOrigin::Canvas {
        s.scene.set_dragging(element, true);
    }
    log::debug!("[{:?}] press on {}", source, element);
    true
}

/// Returns whether a drag is in progress.
pub(crate) fn drag_move(shared: &Shared, client: Vec2, source: GestureSource) -> bool {
    let mut s = shared.borrow_mut();
    if s.dragged_element().is_none() {
        return false;
    }
    let pointer = input::client_to_board(client, &s.board_rect());
    s.dispatch(Command::Drag(DragEvent::Move { source, pointer }));
    true
}

pub(crate) fn release(shared: &Shared, client: Vec2, source: GestureSource) -> bool {
    let mut s = shared.borrow_mut();
    let Some(element) = s.dragged_element() else {
        return false;
    };
    let board = s.board_rect();
    let target = input::drop_target(client, &board, &dom::zone_rects(&s.document));
    let pointer = input::client_to_board(client, &board);
    s.dispatch(Command::Drag(DragEvent::Drop {
        source,
        pointer,
        target,
    }));
    s.scene.set_dragging(element, false);
    true
}

/// The pointer left the page: drop the gesture without effects.
pub(crate) fn cancel(shared: &Shared) {
    let mut s = shared.borrow_mut();
    if let Some(element) = s.dragged_element() {
        s.dispatch(Command::Drag(DragEvent::Leave));
        s.scene.set_dragging(element, false);
    }
}

#[inline]
pub(crate) fn client_point(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}
