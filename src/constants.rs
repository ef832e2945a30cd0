/// Front-end constants: DOM hooks, canvas sizing and render target setup.
///
/// Scene tuning (camera, lights, motion) lives in `scene_core::constants`;
/// this module only holds what the browser side needs.
// Element the canvas is appended to; its data attributes carry overrides
pub const HOST_SELECTOR: &str = "div.intro";

// Backing pixels per CSS pixel
pub const PIXEL_RATIO: f64 = 1.0;

// Inline style applied to the created canvas
pub const CANVAS_STYLE: &str = "display: block; touch-action: none;";

// Offscreen clear: transparent black so the page shows through
pub const CLEAR_RGBA: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

// Depth buffer clear value (far plane)
pub const DEPTH_CLEAR: f32 = 1.0;

// Output pass exposure multiplier applied before tone mapping
pub const OUTPUT_EXPOSURE: f32 = 1.0;

// Swapchain frames in flight
pub const MAX_FRAME_LATENCY: u32 = 2;
