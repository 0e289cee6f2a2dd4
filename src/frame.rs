use crate::session::Shared;
use rigging_core::Command;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Drive running cable falls from `requestAnimationFrame`.
pub fn start_loop(shared: Shared) {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        // skipped when an input handler holds the session; the next frame catches up
        if let Ok(mut s) = shared.try_borrow_mut() {
            if s.app.any_falling() {
                s.dispatch(Command::Tick {
                    now_ms: instant::now(),
                });
            }
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &TickSlot) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
