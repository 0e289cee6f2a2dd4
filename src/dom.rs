use crate::input::{self, ScreenRect};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(document: &web::Document, element_id: &str, mut handler: impl FnMut() + 'static) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] missing #{}", element_id);
    }
}

pub fn html_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

#[inline]
pub fn screen_rect(el: &web::Element) -> ScreenRect {
    let r = el.get_bounding_client_rect();
    ScreenRect {
        left: r.left() as f32,
        top: r.top() as f32,
        width: r.width() as f32,
        height: r.height() as f32,
    }
}

/// Nearest ancestor (or self) of an event target that matches `selector`.
pub fn closest(target: Option<web::EventTarget>, selector: &str) -> Option<web::Element> {
    target?
        .dyn_into::<web::Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

#[inline]
pub fn set_box(el: &web::HtmlElement, position: Vec2, size: Option<Vec2>) {
    let style = el.style();
    _ = style.set_property("left", &input::px(position.x));
    _ = style.set_property("top", &input::px(position.y));
    if let Some(size) = size {
        _ = style.set_property("width", &input::px(size.x));
        _ = style.set_property("height", &input::px(size.y));
    }
}

pub fn create_html(document: &web::Document, tag: &str) -> Option<web::HtmlElement> {
    document.create_element(tag).ok()?.dyn_into::<web::HtmlElement>().ok()
}

pub fn create_svg(document: &web::Document, tag: &str) -> Option<web::Element> {
    document
        .create_element_ns(Some(crate::constants::SVG_NS), tag)
        .ok()
}

/// Every supply zone on the page with its current client rectangle.
pub fn zone_rects(document: &web::Document) -> Vec<(rigging_core::Zone, ScreenRect)> {
    let mut out = Vec::new();
    let Ok(list) = document.query_selector_all(crate::constants::ZONE_SELECTOR) else {
        return out;
    };
    for i in 0..list.length() {
        let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        if let Some(zone) = el
            .get_attribute(crate::constants::ATTR_ZONE)
            .and_then(|z| input::parse_zone(&z))
        {
            out.push((zone, screen_rect(&el)));
        }
    }
    out
}
