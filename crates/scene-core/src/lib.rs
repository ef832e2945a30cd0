pub mod anim;
pub mod choreography;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod orbit;
pub mod scene;
pub mod state;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static NOISE_WGSL: &str = include_str!("../shaders/noise.wgsl");
pub static OUTPUT_WGSL: &str = include_str!("../shaders/output.wgsl");

pub use anim::{Animator, ElementId, ElementStyle};
pub use choreography::{Choreography, ElementResolver};
pub use config::{SceneConfig, ToneMapping};
pub use error::SceneError;
pub use model::{Model, ModelVertex};
pub use orbit::{OrbitController, OrbitSettings};
pub use scene::{Phase, Scene, SceneUniforms};
pub use state::{Clock, NoiseUniforms, RenderState, Viewport};
