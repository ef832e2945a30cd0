#![cfg(target_arch = "wasm32")]
use scene_core::{
    Animator, Choreography, Clock, OrbitController, OrbitSettings, RenderState, Scene, SceneConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod loader;
mod render;
mod reveal;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("landing-scene starting");

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

    let host = dom::find_host(&document)?;
    let config = SceneConfig::default().with_overrides(|name| host.get_attribute(name));
    log::info!(
        "[config] asset={} auto_rotate_speed={} scroll_pulse={} tone_mapping={:?}",
        config.asset_path,
        config.auto_rotate_speed,
        config.scroll_pulse,
        config.tone_mapping
    );

    let viewport = dom::viewport(&window);
    let canvas = dom::create_canvas(&document, &host, viewport)?;

    // Phase 1: scene ready, header hidden until the model arrives
    let clock = Clock::new();
    let mut resolver = dom::DomResolver::new(document.clone());
    let mut animator = Animator::new();
    let choreography = Choreography::new();
    choreography.preload(&mut animator, &mut resolver, clock.elapsed_secs());

    let scene = Scene::new(viewport);
    let state = RenderState::new(viewport, config.scroll_pulse);
    let orbit = OrbitController::new(OrbitSettings {
        auto_rotate_speed: config.auto_rotate_speed,
        ..OrbitSettings::default()
    });

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        state,
        orbit,
        pointer: input::PointerTracker::default(),
        animator,
        choreography,
        resolver,
        clock,
        canvas: canvas.clone(),
        gpu: None,
    }));

    // listeners and the fetch go out before the adapter await
    events::wire_window_events(&frame_ctx);
    events::wire_pointer_events(&canvas, &frame_ctx);

    // Phase 2: asset ready fires once the model is attached
    loader::spawn_asset_load(frame_ctx.clone(), config.asset_path.clone());

    frame::start_loop(frame_ctx.clone());

    // frames tick without a surface until the device arrives; the first
    // render after this resizes to whatever the viewport is by then
    let gpu = frame::init_gpu(&canvas, config.tone_mapping).await;
    frame_ctx.borrow_mut().gpu = gpu;
    Ok(())
}
