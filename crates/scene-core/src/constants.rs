/// Scene, motion and post-processing tuning constants.
///
/// These express the fixed visual composition of the page and keep magic
/// numbers out of the code. Values marked as overridable can be replaced at
/// startup through `SceneConfig`.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START_Z: f32 = -400.0;

// Lights (sRGB hex colors, converted to linear for shading)
pub const AMBIENT_COLOR_HEX: u32 = 0x404040;
pub const AMBIENT_INTENSITY: f32 = 1.0;
pub const KEY_LIGHT_COLOR_HEX: u32 = 0xfff0ff;
pub const KEY_LIGHT_INTENSITY: f32 = 0.8;
pub const KEY_LIGHT_POSITION: [f32; 3] = [-1.0, 1.0, 3.0];
pub const FILL_LIGHT_COLOR_HEX: u32 = 0xffffff;
pub const FILL_LIGHT_INTENSITY: f32 = 0.3;
pub const FILL_LIGHT_POSITION: [f32; 3] = [0.0, 1.0, 0.0];

// Scene graph layout
pub const LOAD_GROUP_OFFSET_Y: f32 = -10.0;

// Scroll-driven rotation (radians per CSS pixel of vertical scroll)
pub const SCROLL_ROTATION_PER_PX: f64 = 0.005;

// Effect intensity smoothing (fraction of the remaining gap closed per frame)
pub const EFFECT_SMOOTHING_RATE: f32 = 0.05;

// Scroll pulse: how long the aim stays raised after the last scroll event
pub const SCROLL_PULSE_HOLD_SEC: f64 = 0.5;
pub const SCROLL_PULSE_AIM: f32 = 1.0;

// Orbit controls
pub const AUTO_ROTATE_SPEED: f32 = 3.0; // overridable
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;
pub const ORBIT_ZOOM_SPEED: f32 = 1.0;
pub const ORBIT_POLAR_EPS: f32 = 1e-6;

// Asset
pub const DEFAULT_ASSET_PATH: &str = "logoxn.glb"; // overridable

// DOM animation defaults (seconds)
pub const DEFAULT_TWEEN_DURATION_SEC: f64 = 0.3;
