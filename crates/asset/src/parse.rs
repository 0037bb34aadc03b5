use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use image::ImageFormat;
use math::mat::Mat4;
use scene::{
    AttributeBuffer, ComponentType, ElementShape, Format, Image, IndexBuffer,
    IndexType, ModelData, RenderRecord, TypedBuffer, NORMAL, POSITION,
};

use crate::description::{Node, SceneDescription};
use crate::error::{AssetError, AssetResult};

/// Every asset exported for the viewer carries at least this many buffer
/// views; fewer means a truncated or foreign file.
pub const DEFAULT_MIN_BUFFER_VIEWS: usize = 5;

/// Turns a decoded scene description plus its binary chunk into render
/// records, one per mesh-bearing node.
#[derive(Debug, Clone)]
pub struct SceneAssetParser {
    min_buffer_views: usize,
}

impl Default for SceneAssetParser {
    fn default() -> Self {
        Self { min_buffer_views: DEFAULT_MIN_BUFFER_VIEWS }
    }
}

impl SceneAssetParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_buffer_views(mut self, count: usize) -> Self {
        self.min_buffer_views = count;
        self
    }

    /// Builds the full primitive map or fails as a whole. Images are decoded
    /// once each and shared between the records that reference them.
    ///
    /// Runs to completion without suspending; fetching the bytes is the
    /// caller's await point.
    pub fn parse(&self, desc: &SceneDescription, blob: Option<&[u8]>)
        -> AssetResult<ModelData> {
        let blob = blob.ok_or(AssetError::MissingBinaryChunk)?;

        if desc.buffer_views.len() < self.min_buffer_views {
            return Err(AssetError::NotEnoughBufferViews {
                found: desc.buffer_views.len(),
                required: self.min_buffer_views,
            });
        }

        let nodes = desc.nodes.as_ref().ok_or(AssetError::MissingNodes)?;
        let meshes = desc.meshes.as_ref().ok_or(AssetError::MissingMeshes)?;
        let views = resolve_buffer_views(desc, blob)?;

        let mut images: HashMap<usize, Arc<Image>> = HashMap::new();
        let mut model = ModelData::new();

        for (node_index, node) in nodes.iter().enumerate() {
            let Some(mesh_index) = node.mesh else {
                continue;
            };
            let mesh = meshes.get(mesh_index).ok_or(AssetError::MissingMesh {
                node: node_index,
                mesh: mesh_index,
            })?;
            let name = mesh.name.clone()
                .unwrap_or_else(|| format!("mesh_{mesh_index}"));

            let primitive = match mesh.primitives.first() {
                Some(p) => p,
                None => return Err(AssetError::EmptyMesh(name)),
            };
            if mesh.primitives.len() > 1 {
                log::debug!("mesh '{name}': using the first of {} primitives",
                            mesh.primitives.len());
            }

            let mut attributes = BTreeMap::new();
            for (semantic, &accessor) in &primitive.attributes {
                attributes.insert(semantic.clone(),
                                  read_accessor(desc, &views, accessor)?);
            }
            for required in [POSITION, NORMAL] {
                if !attributes.contains_key(required) {
                    return Err(AssetError::MissingAttribute {
                        mesh: name,
                        attribute: required,
                    });
                }
            }

            let indices = match primitive.indices {
                Some(accessor) => {
                    let data = read_accessor(desc, &views, accessor)?.data;
                    Some(IndexBuffer {
                        index_type: IndexType::for_component(data.component_type()),
                        data,
                    })
                }
                None => None,
            };

            let vertex_count = match &indices {
                Some(ib) => ib.data.len(),
                None => attributes[POSITION].count(),
            };

            let texture = match primitive.material {
                Some(material) =>
                    base_color_image(desc, &views, material, &mut images)?,
                None => None,
            };

            let record = RenderRecord {
                attributes,
                indices,
                texture,
                vertex_count,
                transform: bake_node_transform(node),
            };

            log::debug!("node {node_index} -> '{name}': {vertex_count} vertices");
            if model.primitives.insert(name.clone(), record).is_some() {
                log::warn!("primitive '{name}' defined more than once, keeping the last");
            }
        }

        log::info!("parsed {} primitives, {} images", model.len(), images.len());
        Ok(model)
    }
}

/// Local node placement: scale, then rotation, then translation, then the
/// explicit matrix if one is given.
pub fn bake_node_transform(node: &Node) -> Mat4 {
    let mut transform = Mat4::identity();
    if let Some([x, y, z]) = node.scale {
        transform.scale(x, y, z);
    }
    if let Some([x, y, z, w]) = node.rotation {
        transform.rotate_with_quaternion(x, y, z, w);
    }
    if let Some([x, y, z]) = node.translation {
        transform.translate(x, y, z);
    }
    if let Some(matrix) = &node.matrix {
        transform.multiply_right(&Mat4::from_cols_array(matrix));
    }
    transform
}

fn resolve_buffer_views<'a>(desc: &SceneDescription, blob: &'a [u8])
    -> AssetResult<Vec<&'a [u8]>> {
    desc.buffer_views.iter().enumerate()
        .map(|(i, view)| {
            if view.buffer != 0 {
                return Err(AssetError::UnsupportedBuffer { view: i, buffer: view.buffer });
            }
            view.byte_offset.checked_add(view.byte_length)
                .and_then(|end| blob.get(view.byte_offset..end))
                .ok_or(AssetError::BufferViewOutOfRange {
                    view: i,
                    offset: view.byte_offset,
                    length: view.byte_length,
                    available: blob.len(),
                })
        })
        .collect()
}

fn read_accessor(desc: &SceneDescription, views: &[&[u8]], index: usize)
    -> AssetResult<AttributeBuffer> {
    let accessor = desc.accessors.get(index)
        .ok_or(AssetError::MissingAccessor(index))?;

    let ty = ComponentType::from_code(accessor.component_type)
        .ok_or(AssetError::UnknownComponentType {
            accessor: index,
            code: accessor.component_type,
        })?;
    let shape = ElementShape::from_name(&accessor.shape)
        .ok_or_else(|| AssetError::UnknownElementShape {
            accessor: index,
            shape: accessor.shape.clone(),
        })?;

    let view_index = accessor.buffer_view
        .ok_or(AssetError::AccessorWithoutBufferView(index))?;
    let view = views.get(view_index)
        .ok_or(AssetError::MissingBufferView(view_index))?;

    let element_size = ty.size() * shape.components();
    let stride = desc.buffer_views[view_index].byte_stride
        .filter(|&s| s >= element_size)
        .unwrap_or(element_size);

    let bytes = view.get(accessor.byte_offset..)
        .ok_or(AssetError::AccessorOutOfBounds(index))?;

    // Without a count the accessor covers the rest of its view.
    let count = match accessor.count {
        Some(count) => count,
        None if bytes.len() < element_size => 0,
        None => (bytes.len() - element_size) / stride + 1,
    };
    // Last element starts at (count - 1) * stride. Counts come from the file,
    // so the extent is computed with overflow checks.
    let extent = match count {
        0 => Some(0),
        _ => (count - 1).checked_mul(stride)
            .and_then(|start| start.checked_add(element_size)),
    };
    match extent {
        Some(extent) if extent <= bytes.len() => {}
        _ => return Err(AssetError::AccessorOutOfBounds(index)),
    }

    let data = if stride == element_size {
        TypedBuffer::from_le_bytes(ty, &bytes[..count * element_size])
    } else {
        let mut packed = Vec::with_capacity(count * element_size);
        for element in bytes.chunks(stride).take(count) {
            packed.extend_from_slice(&element[..element_size]);
        }
        TypedBuffer::from_le_bytes(ty, &packed)
    };

    Ok(AttributeBuffer { components: shape.components(), data })
}

fn base_color_image(desc: &SceneDescription, views: &[&[u8]], material: usize,
                    cache: &mut HashMap<usize, Arc<Image>>)
    -> AssetResult<Option<Arc<Image>>> {
    let material = desc.materials.get(material)
        .ok_or(AssetError::MissingMaterial(material))?;
    let Some(texture) = material.base_color_texture() else {
        return Ok(None);
    };
    let Some(source) = desc.textures.get(texture)
        .ok_or(AssetError::MissingTexture(texture))?
        .source else {
        return Ok(None);
    };

    if let Some(image) = cache.get(&source) {
        return Ok(Some(image.clone()));
    }

    let entry = desc.images.get(source).ok_or(AssetError::MissingImage(source))?;
    let Some(view) = entry.buffer_view else {
        log::warn!("image {source} is not embedded ({}), skipping",
                   entry.uri.as_deref().unwrap_or("no uri"));
        return Ok(None);
    };
    let bytes = views.get(view).ok_or(AssetError::MissingBufferView(view))?;

    let decoded = Arc::new(decode_image(bytes, entry.mime_type.as_deref())?);
    log::debug!("image {source}: {}x{}", decoded.width, decoded.height);
    cache.insert(source, decoded.clone());
    Ok(Some(decoded))
}

/// Formats glTF allows for embedded images. Anything else is sniffed.
fn image_format(mime_type: &str) -> Option<ImageFormat> {
    match mime_type {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

fn decode_image(bytes: &[u8], mime_type: Option<&str>) -> AssetResult<Image> {
    let decoded = match mime_type.and_then(image_format) {
        Some(format) => image::load_from_memory_with_format(bytes, format)?,
        None => image::load_from_memory(bytes)?,
    };
    let rgba = decoded.to_rgba8();

    Ok(Image {
        width: rgba.width(),
        height: rgba.height(),
        format: Format::RGBA8,
        data: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::BufferView;

    #[test]
    fn bake_translation_is_not_scaled() {
        let node = Node {
            scale: Some([2., 2., 2.]),
            translation: Some([1., 0., 0.]),
            ..Default::default()
        };
        let m = bake_node_transform(&node);
        let origin = m.transform_point(math::Vec3::ZERO);
        assert!((origin - math::Vec3::new(1., 0., 0.)).length() < 1e-6);
        let x = m.transform_point(math::Vec3::X);
        assert!((x - math::Vec3::new(3., 0., 0.)).length() < 1e-6);
    }

    #[test]
    fn bake_rotation_between_scale_and_translation() {
        // 90 degrees about z
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let node = Node {
            scale: Some([2., 1., 1.]),
            rotation: Some([0., 0., h, h]),
            translation: Some([0., 0., 5.]),
            ..Default::default()
        };
        let p = bake_node_transform(&node).transform_point(math::Vec3::X);
        assert!((p - math::Vec3::new(0., 2., 5.)).length() < 1e-5);
    }

    #[test]
    fn bake_explicit_matrix_after_trs() {
        let mut matrix = Mat4::identity();
        matrix.translate(0., 3., 0.);
        let node = Node {
            translation: Some([1., 0., 0.]),
            matrix: Some(matrix.to_cols_array()),
            ..Default::default()
        };
        let p = bake_node_transform(&node).transform_point(math::Vec3::ZERO);
        assert!((p - math::Vec3::new(1., 3., 0.)).length() < 1e-6);
    }

    #[test]
    fn bake_empty_node_is_identity() {
        assert_eq!(bake_node_transform(&Node::default()), Mat4::identity());
    }

    #[test]
    fn buffer_view_past_blob_is_rejected() {
        let desc = SceneDescription {
            buffer_views: vec![BufferView { byte_offset: 4, byte_length: 8, ..Default::default() }],
            ..Default::default()
        };
        let err = resolve_buffer_views(&desc, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, AssetError::BufferViewOutOfRange { view: 0, available: 10, .. }));
    }
}
