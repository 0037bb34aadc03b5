use std::future::Future;
use std::path::{Path, PathBuf};

pub mod description;
pub mod error;
pub mod parse;

pub use description::SceneDescription;
pub use error::{AssetError, AssetResult};
pub use parse::{bake_node_transform, SceneAssetParser, DEFAULT_MIN_BUFFER_VIEWS};

use scene::ModelData;

/// Where the raw bytes of a binary asset come from.
pub trait AssetSource {
    fn fetch(&self) -> impl Future<Output = AssetResult<Vec<u8>>>;

    /// Shown in log messages.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSource for FileSource {
    fn fetch(&self) -> impl Future<Output = AssetResult<Vec<u8>>> {
        let path = self.path.clone();
        async move { Ok(std::fs::read(path)?) }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Bytes already in memory, mostly for tests and embedded assets.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self) -> impl Future<Output = AssetResult<Vec<u8>>> {
        let bytes = self.bytes.clone();
        async move { Ok(bytes) }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Fetches a GLB container, decodes its JSON chunk and parses it against the
/// binary chunk.
pub async fn load<S: AssetSource>(source: &S, parser: &SceneAssetParser)
    -> AssetResult<ModelData> {
    let bytes = source.fetch().await?;
    log::debug!("{}: {} bytes", source.describe(), bytes.len());

    let glb = gltf::Glb::from_slice(&bytes)?;
    let desc = SceneDescription::from_json(&glb.json)?;
    parser.parse(&desc, glb.bin.as_deref())
}

pub async fn load_file(path: impl AsRef<Path>) -> AssetResult<ModelData> {
    load(&FileSource::new(path), &SceneAssetParser::default()).await
}
