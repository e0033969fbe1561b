//! Error types for asset decoding
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("asset contains no mesh geometry")]
    EmptyScene,

    #[error("mesh primitive is missing vertex positions")]
    MissingPositions,

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}
