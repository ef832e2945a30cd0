use crate::dom::{self, DomResolver};
use crate::input::PointerTracker;
use crate::render;
use glam::Vec2;
use scene_core::{
    Animator, Choreography, Clock, ElementId, Model, OrbitController, RenderState, Scene,
    SceneError, ToneMapping, Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the frame tick, the window events and the asset load touch.
pub struct FrameContext<'a> {
    pub scene: Scene,
    pub state: RenderState,
    pub orbit: OrbitController,
    pub pointer: PointerTracker,

    pub animator: Animator,
    pub choreography: Choreography,
    pub resolver: DomResolver,

    pub clock: Clock,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
}

impl<'a> FrameContext<'a> {
    /// Advance orbit, scroll rotation, effect and uniforms, then write the
    /// element styles that changed.
    pub fn update(&mut self) {
        let now = self.clock.elapsed_secs();
        self.state
            .tick(&mut self.scene, &mut self.orbit, dom::scroll_y(), now);
        for (id, style) in self.animator.sample(now) {
            self.resolver.apply_style(id, &style);
        }
    }

    pub fn render(&mut self) {
        let Some(g) = &mut self.gpu else {
            return;
        };
        if !g.has_mesh() {
            if let Some(model) = self.scene.model() {
                g.upload_model(model);
            }
        }
        let vp = self.state.viewport();
        g.resize_if_needed(vp.width, vp.height);
        if let Err(e) = g.render(&self.scene.uniforms(), &self.state.noise()) {
            log::error!("render error: {:?}", e);
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        if !self.state.on_resize(&mut self.scene, viewport) {
            return;
        }
        dom::size_canvas(&self.canvas, viewport);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(viewport.width, viewport.height);
        }
        log::debug!("[resize] {}x{}", viewport.width, viewport.height);
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        let now = self.clock.elapsed_secs();
        self.state.on_scroll(&mut self.scene, scroll_y, now);
    }

    pub fn on_pointer_down(&mut self, pointer_id: i32, pos: Vec2) -> bool {
        if !self.pointer.press(pointer_id) {
            return false;
        }
        self.orbit.pointer_down(pos);
        true
    }

    pub fn on_pointer_move(&mut self, pointer_id: i32, pos: Vec2) {
        if self.pointer.is_active(pointer_id) {
            let height = self.state.viewport().height as f32;
            self.orbit.pointer_move(pos, height);
        }
    }

    pub fn on_pointer_up(&mut self, pointer_id: i32) -> bool {
        if !self.pointer.release(pointer_id) {
            return false;
        }
        self.orbit.pointer_up();
        true
    }

    /// Attach the loaded model and start the entrance. Returns the sections
    /// to observe for reveal.
    pub fn on_asset_ready(&mut self, model: Model) -> Result<Vec<ElementId>, SceneError> {
        self.scene.attach_model(model)?;
        let now = self.clock.elapsed_secs();
        Ok(self
            .choreography
            .entrance(&mut self.animator, &mut self.resolver, now))
    }

    pub fn reveal(&mut self, section: ElementId) {
        let now = self.clock.elapsed_secs();
        self.choreography
            .reveal(&mut self.animator, &mut self.resolver, section, now);
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    tone_mapping: ToneMapping,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, tone_mapping).await {
        Ok(g) => {
            log::info!("[gpu] ready");
            Some(g)
        }
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive `frame_ctx` from requestAnimationFrame. The next frame is requested
/// after the update and before the render of the current one.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut ctx = frame_ctx.borrow_mut();
        ctx.update();
        request_frame(&tick_clone);
        ctx.render();
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
