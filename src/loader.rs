use crate::frame::FrameContext;
use crate::reveal;
use scene_core::Model;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

async fn fetch_bytes(path: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    if !resp.ok() {
        anyhow::bail!("GET {} returned {}", path, resp.status());
    }
    let buf = resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let buf = JsFuture::from(buf)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn load_model(path: &str) -> anyhow::Result<Model> {
    let bytes = fetch_bytes(path).await?;
    log::debug!("[loader] fetched {} ({} bytes)", path, bytes.len());
    Ok(Model::from_glb(&bytes)?)
}

/// Fetch and decode the model, then attach it and start the entrance.
/// On failure the scene keeps rendering without a model.
pub fn spawn_asset_load(ctx: Rc<RefCell<FrameContext<'static>>>, path: String) {
    spawn_local(async move {
        let model = match load_model(&path).await {
            Ok(m) => m,
            Err(e) => {
                log::error!("[loader] failed to load {}: {:?}", path, e);
                return;
            }
        };
        log::info!("[loader] {} decoded: {} vertices", path, model.vertex_count());
        let sections = match ctx.borrow_mut().on_asset_ready(model) {
            Ok(s) => s,
            Err(e) => {
                log::error!("[loader] {}", e);
                return;
            }
        };
        if let Err(e) = reveal::observe_sections(&ctx, &sections) {
            log::error!("[reveal] {:?}", e);
        }
    });
}
