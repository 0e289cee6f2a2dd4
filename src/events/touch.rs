use super::{cancel, client_point, drag_move, press, release};
use crate::session::Shared;
use glam::Vec2;
use rigging_core::GestureSource;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn first_changed_touch(ev: &web::TouchEvent) -> Option<Vec2> {
    let t = ev.changed_touches().get(0)?;
    Some(client_point(t.client_x(), t.client_y()))
}

pub fn wire_touch_handlers(shared: &Shared, document: &web::Document) {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);

    let s = shared.clone();
    add_touch_listener(document, "touchstart", &opts, move |ev| {
        let Some(client) = first_changed_touch(&ev) else {
            return;
        };
        if press(&s, ev.target(), client, GestureSource::Touch) {
            ev.prevent_default();
        }
    });

    let s = shared.clone();
    add_touch_listener(document, "touchmove", &opts, move |ev| {
        let Some(client) = first_changed_touch(&ev) else {
            return;
        };
        if drag_move(&s, client, GestureSource::Touch) {
            ev.prevent_default();
        }
    });

    let s = shared.clone();
    add_touch_listener(document, "touchend", &opts, move |ev| {
        let Some(client) = first_changed_touch(&ev) else {
            return;
        };
        if release(&s, client, GestureSource::Touch) {
            ev.prevent_default();
        }
    });

    let s = shared.clone();
    add_touch_listener(document, "touchcancel", &opts, move |_ev| cancel(&s));
}

fn add_touch_listener(
    document: &web::Document,
    kind: &str,
    opts: &web::AddEventListenerOptions,
    mut handler: impl FnMut(web::TouchEvent) + 'static,
) {
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::TouchEvent| handler(ev)) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        opts,
    );
    closure.forget();
}
