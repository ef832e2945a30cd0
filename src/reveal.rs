use crate::frame::FrameContext;
use scene_core::ElementId;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Watch `sections` and reveal each one the first time it scrolls into view.
/// A section stops being observed once revealed.
pub fn observe_sections(
    ctx: &Rc<RefCell<FrameContext<'static>>>,
    sections: &[ElementId],
) -> anyhow::Result<()> {
    if sections.is_empty() {
        return Ok(());
    }
    let ctx_cb = ctx.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: web::IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                let mut c = ctx_cb.borrow_mut();
                if let Some(id) = c.resolver.id_of(&target) {
                    c.reveal(id);
                }
                observer.unobserve(&target);
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

    let observer = web::IntersectionObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    callback.forget();

    let c = ctx.borrow();
    for &id in sections {
        if let Some(el) = c.resolver.element(id) {
            observer.observe(el);
        }
    }
    log::info!("[reveal] observing {} sections", sections.len());
    Ok(())
}
