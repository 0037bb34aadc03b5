use math::mat::Mat4;
use scene::RenderRecord;

/// Device context handed to models for each frame. Implementations upload
/// records and issue the actual draws.
pub trait DrawTarget {
    fn set_projection(&mut self, projection: &Mat4);
    fn draw(&mut self, primitive: &str, record: &RenderRecord, model_view: &Mat4);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: String,
    pub model_view: Mat4,
    pub vertex_count: usize,
    pub indexed: bool,
    pub textured: bool,
}

/// Records draws instead of submitting them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    projection: Mat4,
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn vertex_count(&self) -> usize {
        self.calls.iter().map(|c| c.vertex_count).sum()
    }
}

impl DrawTarget for DrawList {
    fn set_projection(&mut self, projection: &Mat4) {
        self.projection = *projection;
    }

    fn draw(&mut self, primitive: &str, record: &RenderRecord, model_view: &Mat4) {
        self.calls.push(DrawCall {
            primitive: primitive.to_string(),
            model_view: *model_view,
            vertex_count: record.vertex_count,
            indexed: record.indices.is_some(),
            textured: record.texture.is_some(),
        });
    }
}
