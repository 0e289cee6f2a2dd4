use super::{cancel, client_point, drag_move, press, release};
use crate::input;
use crate::session::Shared;
use rigging_core::GestureSource;
use wasm_bindgen::JsCast;
use web_sys as web;

// Touch contacts are handled by the touch listeners.
#[inline]
fn is_touch(ev: &web::PointerEvent) -> bool {
    ev.pointer_type() == "touch"
}

pub fn wire_pointer_handlers(shared: &Shared, document: &web::Document) {
    wire_pointerdown(shared, document);
    wire_pointermove(shared, document);
    wire_pointerup(shared, document);
    wire_pointerleave(shared, document);
}

fn wire_pointerdown(shared: &Shared, document: &web::Document) {
    let shared = shared.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if is_touch(&ev) || !input::is_primary_button(ev.button()) {
            return;
        }
        let client = client_point(ev.client_x(), ev.client_y());
        if press(&shared, ev.target(), client, GestureSource::Pointer) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(shared: &Shared, document: &web::Document) {
    let shared = shared.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if is_touch(&ev) {
            return;
        }
        let client = client_point(ev.client_x(), ev.client_y());
        if drag_move(&shared, client, GestureSource::Pointer) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(shared: &Shared, document: &web::Document) {
    let shared = shared.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if is_touch(&ev) {
            return;
        }
        let client = client_point(ev.client_x(), ev.client_y());
        if release(&shared, client, GestureSource::Pointer) {
            log::debug!("[mouse] released at ({}, {})", ev.client_x(), ev.client_y());
        }
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(shared: &Shared, document: &web::Document) {
    let Some(root) = document.document_element() else {
        return;
    };
    let shared = shared.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        cancel(&shared);
    }) as Box<dyn FnMut(_)>);
    _ = root.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}
