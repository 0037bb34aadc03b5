use std::collections::BTreeMap;
use std::sync::Arc;

use math::mat::Mat4;

pub mod camera;

pub use camera::*;
use bytemuck::cast_slice;

pub const POSITION: &str = "POSITION";
pub const NORMAL: &str = "NORMAL";
pub const TEXCOORD_0: &str = "TEXCOORD_0";
pub const COLOR_0: &str = "COLOR_0";

/// Numeric type of a single accessor component, keyed by the glTF codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn from_code(code: u32) -> Option<ComponentType> {
        match code {
            5120 => Some(ComponentType::I8),
            5121 => Some(ComponentType::U8),
            5122 => Some(ComponentType::I16),
            5123 => Some(ComponentType::U16),
            5125 => Some(ComponentType::U32),
            5126 => Some(ComponentType::F32),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            ComponentType::I8 => 5120,
            ComponentType::U8 => 5121,
            ComponentType::I16 => 5122,
            ComponentType::U16 => 5123,
            ComponentType::U32 => 5125,
            ComponentType::F32 => 5126,
        }
    }

    /// Width in bytes.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

/// Element layout of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementShape {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementShape {
    pub fn from_name(name: &str) -> Option<ElementShape> {
        match name {
            "SCALAR" => Some(ElementShape::Scalar),
            "VEC2" => Some(ElementShape::Vec2),
            "VEC3" => Some(ElementShape::Vec3),
            "VEC4" => Some(ElementShape::Vec4),
            "MAT2" => Some(ElementShape::Mat2),
            "MAT3" => Some(ElementShape::Mat3),
            "MAT4" => Some(ElementShape::Mat4),
            _ => None,
        }
    }

    pub fn components(self) -> usize {
        match self {
            ElementShape::Scalar => 1,
            ElementShape::Vec2 => 2,
            ElementShape::Vec3 => 3,
            ElementShape::Vec4 | ElementShape::Mat2 => 4,
            ElementShape::Mat3 => 9,
            ElementShape::Mat4 => 16,
        }
    }
}

/// Flat, tightly packed component data of one accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

fn read_le<T, const N: usize>(bytes: &[u8], from_le: fn([u8; N]) -> T) -> Vec<T> {
    bytes.chunks_exact(N)
        .map(|c| {
            let mut a = [0u8; N];
            a.copy_from_slice(c);
            from_le(a)
        })
        .collect()
}

impl TypedBuffer {
    /// Decodes little-endian `bytes` as components of type `ty`. Trailing
    /// bytes that do not form a whole component are dropped.
    pub fn from_le_bytes(ty: ComponentType, bytes: &[u8]) -> TypedBuffer {
        match ty {
            ComponentType::I8 => TypedBuffer::I8(read_le(bytes, i8::from_le_bytes)),
            ComponentType::U8 => TypedBuffer::U8(bytes.to_vec()),
            ComponentType::I16 => TypedBuffer::I16(read_le(bytes, i16::from_le_bytes)),
            ComponentType::U16 => TypedBuffer::U16(read_le(bytes, u16::from_le_bytes)),
            ComponentType::U32 => TypedBuffer::U32(read_le(bytes, u32::from_le_bytes)),
            ComponentType::F32 => TypedBuffer::F32(read_le(bytes, f32::from_le_bytes)),
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            TypedBuffer::I8(_) => ComponentType::I8,
            TypedBuffer::U8(_) => ComponentType::U8,
            TypedBuffer::I16(_) => ComponentType::I16,
            TypedBuffer::U16(_) => ComponentType::U16,
            TypedBuffer::U32(_) => ComponentType::U32,
            TypedBuffer::F32(_) => ComponentType::F32,
        }
    }

    /// Number of components (not elements).
    pub fn len(&self) -> usize {
        match self {
            TypedBuffer::I8(v) => v.len(),
            TypedBuffer::U8(v) => v.len(),
            TypedBuffer::I16(v) => v.len(),
            TypedBuffer::U16(v) => v.len(),
            TypedBuffer::U32(v) => v.len(),
            TypedBuffer::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native-endian bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TypedBuffer::I8(v) => cast_slice(v),
            TypedBuffer::U8(v) => v.as_slice(),
            TypedBuffer::I16(v) => cast_slice(v),
            TypedBuffer::U16(v) => cast_slice(v),
            TypedBuffer::U32(v) => cast_slice(v),
            TypedBuffer::F32(v) => cast_slice(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBuffer {
    pub components: usize,
    pub data: TypedBuffer,
}

impl AttributeBuffer {
    /// Number of whole elements (vertices).
    pub fn count(&self) -> usize {
        if self.components == 0 {
            return 0;
        }
        self.data.len() / self.components
    }
}

/// Index element type understood by the draw layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
}

impl IndexType {
    /// u8/u16/u32 map directly; every other component type falls back to
    /// unsigned short.
    pub fn for_component(ty: ComponentType) -> IndexType {
        match ty {
            ComponentType::U8 => IndexType::UnsignedByte,
            ComponentType::U16 => IndexType::UnsignedShort,
            ComponentType::U32 => IndexType::UnsignedInt,
            _ => {
                log::warn!("{ty:?} is not an index type, using unsigned short");
                IndexType::UnsignedShort
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexBuffer {
    pub index_type: IndexType,
    pub data: TypedBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum Format {
    RGBA8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub data: Vec<u8>,
}

/// Everything the draw layer needs for one primitive. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub attributes: BTreeMap<String, AttributeBuffer>,
    pub indices: Option<IndexBuffer>,
    pub texture: Option<Arc<Image>>,
    pub vertex_count: usize,
    /// Node local-to-model placement.
    pub transform: Mat4,
}

impl RenderRecord {
    pub fn attribute(&self, name: &str) -> Option<&AttributeBuffer> {
        self.attributes.get(name)
    }
}

/// Render records of one loaded asset, keyed by primitive (mesh) name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub primitives: BTreeMap<String, RenderRecord>,
}

impl ModelData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RenderRecord> {
        self.primitives.get(name)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderRecord)> {
        self.primitives.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_codes_round_trip() {
        for code in [5120, 5121, 5122, 5123, 5125, 5126] {
            let ty = ComponentType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert_eq!(ComponentType::from_code(5124), None);
        assert_eq!(ComponentType::from_code(5123), Some(ComponentType::U16));
        assert_eq!(ComponentType::U16.size(), 2);
    }

    #[test]
    fn shape_component_counts() {
        let expected = [
            ("SCALAR", 1), ("VEC2", 2), ("VEC3", 3), ("VEC4", 4),
            ("MAT2", 4), ("MAT3", 9), ("MAT4", 16),
        ];
        for (name, n) in expected {
            assert_eq!(ElementShape::from_name(name).unwrap().components(), n);
        }
        assert_eq!(ElementShape::from_name("vec3"), None);
    }

    #[test]
    fn typed_buffer_decodes_little_endian() {
        let bytes = [0x01, 0x02, 0xff, 0xff, 0x00];
        let buf = TypedBuffer::from_le_bytes(ComponentType::U16, &bytes);
        assert_eq!(buf, TypedBuffer::U16(vec![0x0201, 0xffff]));

        let buf = TypedBuffer::from_le_bytes(ComponentType::I16, &bytes[2..4]);
        assert_eq!(buf, TypedBuffer::I16(vec![-1]));

        let buf = TypedBuffer::from_le_bytes(ComponentType::F32, &1.5f32.to_le_bytes());
        assert_eq!(buf, TypedBuffer::F32(vec![1.5]));
        assert_eq!(buf.as_bytes(), &1.5f32.to_ne_bytes());
    }

    #[test]
    fn index_type_by_width() {
        assert_eq!(IndexType::for_component(ComponentType::U8), IndexType::UnsignedByte);
        assert_eq!(IndexType::for_component(ComponentType::U16), IndexType::UnsignedShort);
        assert_eq!(IndexType::for_component(ComponentType::U32), IndexType::UnsignedInt);
        assert_eq!(IndexType::for_component(ComponentType::I16), IndexType::UnsignedShort);
        assert_eq!(IndexType::for_component(ComponentType::F32), IndexType::UnsignedShort);
    }

    #[test]
    fn attribute_count_is_per_element() {
        let attr = AttributeBuffer {
            components: 3,
            data: TypedBuffer::F32(vec![0.; 12]),
        };
        assert_eq!(attr.count(), 4);
    }
}
