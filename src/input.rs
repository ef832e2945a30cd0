use glam::Vec2;

// Pixels per line / page for non-pixel wheel delta modes
const WHEEL_LINE_PX: f32 = 16.0;

/// Tracks the single pointer that owns the current orbit drag.
///
/// Secondary pointers (a second finger, a pen while the mouse is down) are
/// ignored until the owner is released.
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerTracker {
    active: Option<i32>,
}

impl PointerTracker {
    /// Returns true if `id` became the drag owner.
    pub fn press(&mut self, id: i32) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(id);
        true
    }

    #[inline]
    pub fn is_active(&self, id: i32) -> bool {
        self.active == Some(id)
    }

    /// Returns true if `id` owned the drag and released it.
    pub fn release(&mut self, id: i32) -> bool {
        if self.is_active(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

/// Client coordinates relative to an element's top-left corner.
#[inline]
pub fn local_position(client_x: f32, client_y: f32, left: f32, top: f32) -> Vec2 {
    Vec2::new(client_x - left, client_y - top)
}

/// Normalize a wheel delta to pixels. `delta_mode` follows the DOM:
/// 0 pixels, 1 lines, 2 pages.
#[inline]
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32, page_height: f32) -> f32 {
    let d = delta_y as f32;
    match delta_mode {
        1 => d * WHEEL_LINE_PX,
        2 => d * page_height,
        _ => d,
    }
}
