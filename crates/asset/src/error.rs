//! Error types for asset loading.

use thiserror::Error;

/// Structural failures abort the whole load; no partial model is produced.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset has no binary chunk")]
    MissingBinaryChunk,

    #[error("asset has no node list")]
    MissingNodes,

    #[error("asset has no mesh list")]
    MissingMeshes,

    #[error("node {node} references missing mesh {mesh}")]
    MissingMesh { node: usize, mesh: usize },

    #[error("mesh '{0}' has no primitives")]
    EmptyMesh(String),

    #[error("primitive '{mesh}' has no {attribute} attribute")]
    MissingAttribute { mesh: String, attribute: &'static str },

    #[error("accessor {0} not found")]
    MissingAccessor(usize),

    #[error("accessor {0} has no buffer view")]
    AccessorWithoutBufferView(usize),

    #[error("buffer view {0} not found")]
    MissingBufferView(usize),

    #[error("buffer view {view} references buffer {buffer}, only the binary chunk is supported")]
    UnsupportedBuffer { view: usize, buffer: usize },

    #[error("buffer view {view} ({offset}+{length}) exceeds binary chunk of {available} bytes")]
    BufferViewOutOfRange { view: usize, offset: usize, length: usize, available: usize },

    #[error("found {found} buffer views, at least {required} required")]
    NotEnoughBufferViews { found: usize, required: usize },

    #[error("accessor {accessor} has unknown component type {code}")]
    UnknownComponentType { accessor: usize, code: u32 },

    #[error("accessor {accessor} has unknown element type '{shape}'")]
    UnknownElementShape { accessor: usize, shape: String },

    #[error("accessor {0} reads past the end of its buffer view")]
    AccessorOutOfBounds(usize),

    #[error("material {0} not found")]
    MissingMaterial(usize),

    #[error("texture {0} not found")]
    MissingTexture(usize),

    #[error("image {0} not found")]
    MissingImage(usize),

    #[error("invalid GLB container: {0}")]
    Glb(#[from] gltf::Error),

    #[error("invalid scene description: {0}")]
    Description(#[from] serde_json::Error),

    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AssetResult<T> = Result<T, AssetError>;
