use crate::constants::{CANVAS_STYLE, HOST_SELECTOR, PIXEL_RATIO};
use scene_core::{ElementId, ElementResolver, ElementStyle, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Window inner size in CSS pixels; zero when unavailable.
pub fn viewport(window: &web::Window) -> Viewport {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
    };
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

#[inline]
pub fn scroll_y() -> f64 {
    web::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn find_host(document: &web::Document) -> anyhow::Result<web::HtmlElement> {
    document
        .query_selector(HOST_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("missing {}", HOST_SELECTOR))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

/// Create the scene canvas inside `host`, sized to `viewport`.
pub fn create_canvas(
    document: &web::Document,
    host: &web::HtmlElement,
    viewport: Viewport,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas
        .set_attribute("style", CANVAS_STYLE)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    size_canvas(&canvas, viewport);
    host.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// Match the canvas CSS size to the viewport and its backing store to
/// CSS size * pixel ratio.
pub fn size_canvas(canvas: &web::HtmlCanvasElement, viewport: Viewport) {
    let w_px = (viewport.width as f64 * PIXEL_RATIO) as u32;
    let h_px = (viewport.height as f64 * PIXEL_RATIO) as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", viewport.width));
    _ = style.set_property("height", &format!("{}px", viewport.height));
}

/// Maps page elements to stable [`ElementId`]s for the animator.
///
/// An element keeps the id it was first given; ids index `elements`.
pub struct DomResolver {
    document: web::Document,
    elements: Vec<web::HtmlElement>,
}

impl DomResolver {
    pub fn new(document: web::Document) -> Self {
        Self {
            document,
            elements: Vec::new(),
        }
    }

    fn intern(&mut self, element: web::HtmlElement) -> ElementId {
        let node: &web::Node = &element;
        if let Some(i) = self
            .elements
            .iter()
            .position(|e| e.is_same_node(Some(node)))
        {
            return ElementId(i as u32);
        }
        self.elements.push(element);
        ElementId(self.elements.len() as u32 - 1)
    }

    /// Id of an element seen through a DOM callback (e.g. an observer entry).
    pub fn id_of(&mut self, element: &web::Element) -> Option<ElementId> {
        element
            .dyn_ref::<web::HtmlElement>()
            .map(|e| self.intern(e.clone()))
    }

    #[inline]
    pub fn element(&self, id: ElementId) -> Option<&web::HtmlElement> {
        self.elements.get(id.0 as usize)
    }

    pub fn apply_style(&self, id: ElementId, style: &ElementStyle) {
        let Some(el) = self.element(id) else {
            return;
        };
        let css = el.style();
        _ = css.set_property("opacity", &style.opacity.to_string());
        _ = css.set_property("transform", &style.css_transform());
    }
}

impl ElementResolver for DomResolver {
    fn select_all(&mut self, selector: &str) -> Vec<ElementId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("[dom] bad selector {}: {:?}", selector, e);
                return Vec::new();
            }
        };
        let found: Vec<web::HtmlElement> = (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<web::HtmlElement>().ok())
            .collect();
        found.into_iter().map(|e| self.intern(e)).collect()
    }

    fn select_within(&mut self, parent: ElementId, selector: &str) -> Option<ElementId> {
        let parent = self.element(parent)?.clone();
        let child = parent.query_selector(selector).ok().flatten()?;
        let child = child.dyn_into::<web::HtmlElement>().ok()?;
        Some(self.intern(child))
    }
}
