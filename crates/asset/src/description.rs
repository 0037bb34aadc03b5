//! Decoded scene description: the subset of the glTF JSON document the
//! parser walks. Indices refer to the lists of the same description.
//!
//! `gltf::json` is stricter than the files we load: it requires `count` on
//! every accessor and turns a missing `nodes` or `meshes` list into an empty
//! one. Both cases are handled differently here, so the subset is decoded
//! into our own types and `gltf` only splits the GLB container.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneDescription {
    pub nodes: Option<Vec<Node>>,
    pub meshes: Option<Vec<Mesh>>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
}

impl SceneDescription {
    pub fn from_json(json: &[u8]) -> Result<SceneDescription, serde_json::Error> {
        serde_json::from_slice(json)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
    pub name: Option<String>,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
    pub translation: Option<[f32; 3]>,
    /// `[x, y, z, w]`
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    /// Column-major.
    pub matrix: Option<[f32; 16]>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Primitive {
    /// Semantic name (`POSITION`, `NORMAL`, ...) to accessor index.
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    /// glTF component type code (5120..=5126).
    pub component_type: u32,
    /// Element count. When absent the accessor spans the rest of its view.
    pub count: Option<usize>,
    /// Element shape name (`SCALAR`, `VEC3`, ...).
    #[serde(rename = "type")]
    pub shape: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    pub name: Option<String>,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
}

impl Material {
    pub fn base_color_texture(&self) -> Option<usize> {
        self.pbr_metallic_roughness.as_ref()?
            .base_color_texture.as_ref()
            .map(|info| info.index)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PbrMetallicRoughness {
    pub base_color_texture: Option<TextureInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextureInfo {
    pub index: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Texture {
    pub source: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub buffer_view: Option<usize>,
    pub mime_type: Option<String>,
    pub uri: Option<String>,
}
