use glam::Vec2;
use rigging_core::background_path;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Load `src` in a detached image and resolve to its natural size, or `None`
/// when the asset does not exist.
pub async fn natural_size(src: &str) -> Option<Vec2> {
    let img = web::HtmlImageElement::new().ok()?;
    let img_for_promise = img.clone();
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let ok = resolve.clone();
        let onload = Closure::once_into_js(move || {
            _ = ok.call1(&JsValue::NULL, &JsValue::TRUE);
        });
        let onerror = Closure::once_into_js(move || {
            _ = resolve.call1(&JsValue::NULL, &JsValue::FALSE);
        });
        img_for_promise.set_onload(Some(onload.unchecked_ref()));
        img_for_promise.set_onerror(Some(onerror.unchecked_ref()));
    });
    img.set_src(src);
    let loaded = JsFuture::from(promise).await.ok()?.as_bool().unwrap_or(false);
    if !loaded {
        log::info!("[assets] not found: {}", src);
        return None;
    }
    Some(Vec2::new(img.natural_width() as f32, img.natural_height() as f32))
}

/// Highest consecutive background index that exists, probing from 1.
pub async fn count_backgrounds(max_probes: u32) -> u32 {
    let mut found = 0;
    for index in 1..=max_probes {
        if natural_size(&background_path(index)).await.is_none() {
            break;
        }
        found = index;
    }
    log::info!("[assets] {} background(s) available", found);
    found.max(1)
}
