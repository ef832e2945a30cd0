use crate::dom;
use crate::frame::FrameContext;
use crate::input;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Ctx = Rc<RefCell<FrameContext<'static>>>;

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("[events] could not listen for {}: {:?}", event, e);
    }
    closure.forget();
}

#[inline]
fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    input::local_position(
        ev.client_x() as f32,
        ev.client_y() as f32,
        rect.left() as f32,
        rect.top() as f32,
    )
}

/// Resize and scroll listeners on the window.
pub fn wire_window_events(ctx: &Ctx) {
    let Some(window) = web::window() else {
        return;
    };

    let ctx_resize = ctx.clone();
    let win = window.clone();
    listen(&window, "resize", move |_: web::Event| {
        ctx_resize.borrow_mut().on_resize(dom::viewport(&win));
    });

    let ctx_scroll = ctx.clone();
    listen(&window, "scroll", move |_: web::Event| {
        ctx_scroll.borrow_mut().on_scroll(dom::scroll_y());
    });
}

/// Orbit drag and wheel listeners on the canvas.
pub fn wire_pointer_events(canvas: &web::HtmlCanvasElement, ctx: &Ctx) {
    let ctx_down = ctx.clone();
    let canvas_down = canvas.clone();
    listen(canvas, "pointerdown", move |ev: web::PointerEvent| {
        let pos = pointer_canvas_px(&ev, &canvas_down);
        if ctx_down.borrow_mut().on_pointer_down(ev.pointer_id(), pos) {
            _ = canvas_down.set_pointer_capture(ev.pointer_id());
        }
    });

    let ctx_move = ctx.clone();
    let canvas_move = canvas.clone();
    listen(canvas, "pointermove", move |ev: web::PointerEvent| {
        let pos = pointer_canvas_px(&ev, &canvas_move);
        ctx_move.borrow_mut().on_pointer_move(ev.pointer_id(), pos);
    });

    for name in ["pointerup", "pointercancel"] {
        let ctx_up = ctx.clone();
        let canvas_up = canvas.clone();
        listen(canvas, name, move |ev: web::PointerEvent| {
            if ctx_up.borrow_mut().on_pointer_up(ev.pointer_id()) {
                _ = canvas_up.release_pointer_capture(ev.pointer_id());
            }
        });
    }

    // Page scrolling is left alone; the controller ignores the delta while
    // zoom is disabled.
    let ctx_wheel = ctx.clone();
    listen(canvas, "wheel", move |ev: web::WheelEvent| {
        let mut c = ctx_wheel.borrow_mut();
        let page = c.state.viewport().height as f32;
        let dy = input::wheel_delta_px(ev.delta_y(), ev.delta_mode(), page);
        c.orbit.wheel(dy);
    });
}
