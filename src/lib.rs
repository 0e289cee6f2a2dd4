#![cfg(target_arch = "wasm32")]
use rigging_core::constants::MAX_BACKGROUND_PROBES;
use rigging_core::{background_from_query, AppState, BackgroundCursor, LayoutBook, RigConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;
mod session;

static LAYOUTS_JSON: &str = include_str!("../assets/layouts.json");

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("rigging-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let book = LayoutBook::from_json(LAYOUTS_JSON).unwrap_or_else(|e| {
        log::error!("[layout] {}", e);
        LayoutBook::default()
    });

    let query = window.location().search().unwrap_or_default();
    let requested = background_from_query(&query).unwrap_or(1);
    let available = assets::count_backgrounds(MAX_BACKGROUND_PROBES).await;
    let cursor = BackgroundCursor::new(requested, available.max(requested));
    log::info!("[background] starting on {} of {}", cursor.current, cursor.max);

    let scene = render::Scene::new(&document)?;
    let mut app = AppState::new(RigConfig::default(), cursor);
    session::register_templates(&document, &mut app).await;

    let shared = Rc::new(RefCell::new(session::Session::new(app, scene, document.clone(), book)));
    events::wire_all(&shared, &document);
    session::show_current_background(&shared);
    frame::start_loop(shared);
    Ok(())
}
