//! Drawable models. Each model owns the render records of one asset and
//! knows how to place them in the world.

use std::path::{Path, PathBuf};

use asset::{AssetResult, FileSource, SceneAssetParser};
use math::{mat::Mat4, vec::Vec3};
use scene::{ModelData, RenderRecord};

use crate::draw::DrawTarget;

pub trait Model {
    /// Asset file the records are loaded from.
    fn path(&self) -> &Path;

    fn attach(&mut self, data: ModelData);

    /// `None` until a load succeeded.
    fn data(&self) -> Option<&ModelData>;

    fn render(&self, target: &mut dyn DrawTarget, view: &Mat4);
}

/// Loads the model's asset and attaches the records. On failure the model
/// keeps whatever it had before, which is nothing for a fresh model.
pub async fn load_model(model: &mut dyn Model, parser: &SceneAssetParser) -> AssetResult<()> {
    let data = asset::load(&FileSource::new(model.path()), parser).await?;
    log::info!("{}: {} primitives", model.path().display(), data.len());
    model.attach(data);
    Ok(())
}

fn draw_record(target: &mut dyn DrawTarget, name: &str, record: &RenderRecord,
               model_view: &Mat4) {
    target.draw(name, record, &(*model_view * record.transform));
}

/// Draws every record with its baked transform appended to `model_view`.
pub fn render_records(target: &mut dyn DrawTarget, data: &ModelData, model_view: &Mat4) {
    for (name, record) in data.iter() {
        draw_record(target, name, record, model_view);
    }
}

/// Single placement for the whole asset.
#[derive(Debug, Clone)]
pub struct TerrainModel {
    path: PathBuf,
    scale: f32,
    data: Option<ModelData>,
}

impl TerrainModel {
    pub fn new(path: impl AsRef<Path>, scale: f32) -> Self {
        Self { path: path.as_ref().to_path_buf(), scale, data: None }
    }
}

impl Model for TerrainModel {
    fn path(&self) -> &Path {
        &self.path
    }

    fn attach(&mut self, data: ModelData) {
        self.data = Some(data);
    }

    fn data(&self) -> Option<&ModelData> {
        self.data.as_ref()
    }

    fn render(&self, target: &mut dyn DrawTarget, view: &Mat4) {
        let Some(data) = &self.data else {
            return;
        };
        let mut model_view = *view;
        model_view.multiply_right(&Mat4::scaling(Vec3::from_scalar(self.scale)));
        render_records(target, data, &model_view);
    }
}

/// Local placement of one copy of the instanced primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub translation: Vec3,
    /// `[degrees, axis x, axis y, axis z]`
    pub rotation: Option<[f32; 4]>,
}

impl Instance {
    pub fn matrix(&self) -> Mat4 {
        let mut m = Mat4::translation(self.translation);
        if let Some([degrees, x, y, z]) = self.rotation {
            m.multiply_right(&Mat4::rotation(degrees, Vec3::new(x, y, z)));
        }
        m
    }
}

/// Asset placed at `position` whose `primitive` is drawn once per instance,
/// like the wheels of a vehicle. Other primitives are drawn once.
#[derive(Debug, Clone)]
pub struct InstancedModel {
    path: PathBuf,
    position: Vec3,
    primitive: String,
    instances: Vec<Instance>,
    data: Option<ModelData>,
}

impl InstancedModel {
    pub fn new(path: impl AsRef<Path>, position: Vec3, primitive: String,
               instances: Vec<Instance>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            position,
            primitive,
            instances,
            data: None,
        }
    }
}

impl Model for InstancedModel {
    fn path(&self) -> &Path {
        &self.path
    }

    fn attach(&mut self, data: ModelData) {
        if data.get(&self.primitive).is_none() {
            log::warn!("{}: no primitive named '{}' to instance",
                       self.path.display(), self.primitive);
        }
        self.data = Some(data);
    }

    fn data(&self) -> Option<&ModelData> {
        self.data.as_ref()
    }

    fn render(&self, target: &mut dyn DrawTarget, view: &Mat4) {
        let Some(data) = &self.data else {
            return;
        };
        let model_view = *view * Mat4::translation(self.position);

        for (name, record) in data.iter() {
            if name != self.primitive {
                draw_record(target, name, record, &model_view);
                continue;
            }
            for instance in &self.instances {
                let instance_view = model_view * instance.matrix();
                draw_record(target, name, record, &instance_view);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::draw::DrawList;

    fn record(translation: Vec3) -> RenderRecord {
        RenderRecord {
            attributes: BTreeMap::new(),
            indices: None,
            texture: None,
            vertex_count: 3,
            transform: Mat4::translation(translation),
        }
    }

    fn data(names: &[(&str, Vec3)]) -> ModelData {
        let mut data = ModelData::new();
        for (name, t) in names {
            data.primitives.insert(name.to_string(), record(*t));
        }
        data
    }

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn unloaded_model_draws_nothing() {
        let mut list = DrawList::new();
        TerrainModel::new("t.glb", 10.).render(&mut list, &Mat4::identity());
        assert!(list.calls().is_empty());
    }

    #[test]
    fn terrain_scales_baked_geometry() {
        let mut terrain = TerrainModel::new("t.glb", 10.);
        terrain.attach(data(&[("ground", Vec3::new(1., 0., 0.))]));

        let mut list = DrawList::new();
        terrain.render(&mut list, &Mat4::identity());
        assert_eq!(list.calls().len(), 1);

        // scale applies after the baked translation
        let p = list.calls()[0].model_view.transform_point(Vec3::ZERO);
        assert!(approx_eq_vec3(p, Vec3::new(10., 0., 0.)));
    }

    #[test]
    fn view_is_applied_last() {
        let mut terrain = TerrainModel::new("t.glb", 1.);
        terrain.attach(data(&[("ground", Vec3::ZERO)]));

        let view = Mat4::translation(Vec3::new(0., 0., -5.));
        let mut list = DrawList::new();
        terrain.render(&mut list, &view);
        let p = list.calls()[0].model_view.transform_point(Vec3::new(1., 0., 0.));
        assert!(approx_eq_vec3(p, Vec3::new(1., 0., -5.)));
    }

    #[test]
    fn instanced_primitive_is_drawn_per_instance() {
        let instances = vec![
            Instance { translation: Vec3::new(3.9, 0.7, 2.2), rotation: None },
            Instance { translation: Vec3::new(3.9, 0.7, -2.2), rotation: Some([180., 0., 1., 0.]) },
        ];
        let mut bus = InstancedModel::new("bus.glb", Vec3::new(10., 0.4, 25.),
                                          "wheel".to_string(), instances);
        bus.attach(data(&[("body", Vec3::ZERO), ("wheel", Vec3::ZERO)]));

        let mut list = DrawList::new();
        bus.render(&mut list, &Mat4::identity());

        let names: Vec<&str> = list.calls().iter().map(|c| c.primitive.as_str()).collect();
        assert_eq!(names, ["body", "wheel", "wheel"]);
        assert_eq!(list.vertex_count(), 9);

        let body = list.calls()[0].model_view.transform_point(Vec3::ZERO);
        assert!(approx_eq_vec3(body, Vec3::new(10., 0.4, 25.)));

        let first = list.calls()[1].model_view.transform_point(Vec3::X);
        assert!(approx_eq_vec3(first, Vec3::new(14.9, 1.1, 27.2)));

        // the rotated copy faces the other way
        let second = list.calls()[2].model_view.transform_point(Vec3::X);
        assert!(approx_eq_vec3(second, Vec3::new(12.9, 1.1, 22.8)));
    }

    #[test]
    fn instance_rotation_applies_before_translation() {
        let instance = Instance {
            translation: Vec3::new(0., 0., 1.),
            rotation: Some([90., 0., 0., 1.]),
        };
        let p = instance.matrix().transform_point(Vec3::X);
        assert!(approx_eq_vec3(p, Vec3::new(0., 1., 1.)));
    }

    #[test]
    fn failed_load_leaves_model_empty() {
        let mut terrain = TerrainModel::new("no/such/terrain.glb", 10.);
        let result = pollster::block_on(load_model(&mut terrain, &SceneAssetParser::default()));
        assert!(result.is_err());
        assert!(terrain.data().is_none());
    }
}
