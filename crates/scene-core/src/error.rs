use thiserror::Error;

/// Failures surfaced by scene assembly and model decoding.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("a model is already attached to the load group")]
    AssetAlreadyAttached,
    #[error("gltf: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model contains no triangles")]
    EmptyModel,
    #[error("buffer {index} is not embedded in the GLB binary chunk")]
    MissingBuffer { index: usize },
}

pub type Result<T> = std::result::Result<T, SceneError>;
