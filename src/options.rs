//! Viewer settings loaded from TOML. Every section is `#[serde(default)]`, so
//! a file only needs the values it changes.

use std::path::{Path, PathBuf};

use math::Vec3;
use scene::{OrbitCamera, Projection, Viewport};
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::model::{Instance, InstancedModel, Model, TerrainModel};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub projection: ProjectionOptions,
    pub viewport: Viewport,
    pub camera: CameraOptions,
    pub asset: AssetOptions,
    pub models: Vec<ModelOptions>,
}

impl ViewerOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn projection(&self) -> Projection {
        self.projection.resolve(self.viewport)
    }

    pub fn camera(&self) -> OrbitCamera {
        let c = &self.camera;
        let mut camera = OrbitCamera::new(Vec3::from_slice(&c.eye),
                                          Vec3::from_slice(&c.center),
                                          self.projection(), self.viewport);
        camera.min_elevation = c.min_elevation;
        camera.max_elevation = c.max_elevation;
        camera.max_camera_angle = c.max_camera_angle;
        camera.min_eye_height = c.min_eye_height;
        camera.degrees_per_pixel = c.degrees_per_pixel;
        camera
    }

    pub fn parser(&self) -> asset::SceneAssetParser {
        asset::SceneAssetParser::default().min_buffer_views(self.asset.min_buffer_views)
    }

    pub fn build_models(&self) -> Vec<Box<dyn Model>> {
        self.models.iter().map(ModelOptions::build).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Width over height. Taken from the viewport when absent.
    pub aspect: Option<f32>,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        let p = Projection::default();
        Self { fov: p.fov, aspect: None, near: p.near, far: p.far }
    }
}

impl ProjectionOptions {
    pub fn resolve(&self, viewport: Viewport) -> Projection {
        Projection {
            fov: self.fov,
            aspect: self.aspect.unwrap_or_else(|| viewport.aspect()),
            near: self.near,
            far: self.far,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub eye: [f32; 3],
    pub center: [f32; 3],
    pub min_elevation: f32,
    pub max_elevation: f32,
    /// Radians.
    pub max_camera_angle: f32,
    pub min_eye_height: f32,
    pub degrees_per_pixel: f32,
    /// Zoom distance per wheel delta unit.
    pub zoom_per_wheel_unit: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            eye: [9., 2., 50.],
            center: [0., 0., 5.],
            min_elevation: 4.,
            max_elevation: 100.,
            max_camera_angle: 0.5,
            min_eye_height: 2.,
            degrees_per_pixel: 1.,
            zoom_per_wheel_unit: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetOptions {
    pub min_buffer_views: usize,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self { min_buffer_views: asset::DEFAULT_MIN_BUFFER_VIEWS }
    }
}

/// One drawable model in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelOptions {
    Terrain {
        path: PathBuf,
        #[serde(default = "unit_scale")]
        scale: f32,
    },
    Instanced {
        path: PathBuf,
        #[serde(default)]
        position: [f32; 3],
        /// Primitive drawn once per entry of `instances`.
        primitive: String,
        #[serde(default)]
        instances: Vec<InstanceOptions>,
    },
}

fn unit_scale() -> f32 {
    1.
}

impl ModelOptions {
    pub fn build(&self) -> Box<dyn Model> {
        match self {
            ModelOptions::Terrain { path, scale } =>
                Box::new(TerrainModel::new(path, *scale)),
            ModelOptions::Instanced { path, position, primitive, instances } => {
                let instances = instances.iter()
                    .map(|i| Instance {
                        translation: Vec3::from_slice(&i.translation),
                        rotation: i.rotation,
                    })
                    .collect();
                Box::new(InstancedModel::new(path, Vec3::from_slice(position),
                                             primitive.clone(), instances))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceOptions {
    pub translation: [f32; 3],
    /// `[degrees, axis x, axis y, axis z]`.
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ViewerOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ViewerOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let opts: ViewerOptions = toml::from_str("
[camera]
min_elevation = 10.0

[viewport]
width = 800
height = 400
").unwrap();
        assert_eq!(opts.camera.min_elevation, 10.);
        assert_eq!(opts.camera.max_elevation, 100.);
        assert_eq!(opts.camera.eye, [9., 2., 50.]);
        assert_eq!(opts.asset.min_buffer_views, 5);
        assert!(opts.models.is_empty());

        // aspect follows the viewport unless given
        assert_eq!(opts.projection().aspect, 2.);
        assert_eq!(opts.projection().fov, 45.);
    }

    #[test]
    fn camera_tunables_are_applied() {
        let mut opts = ViewerOptions::default();
        opts.camera.min_eye_height = 7.;
        opts.camera.max_elevation = 60.;
        let camera = opts.camera();
        assert_eq!(camera.min_eye_height, 7.);
        assert_eq!(camera.max_elevation, 60.);
        assert_eq!(camera.eye(), Vec3::new(9., 2., 50.));
        assert_eq!(camera.center(), Vec3::new(0., 0., 5.));
    }

    #[test]
    fn models_from_toml() {
        let opts: ViewerOptions = toml::from_str(r#"
[[models]]
kind = "terrain"
path = "taganka8.glb"
scale = 10.0

[[models]]
kind = "instanced"
path = "paz3205.glb"
position = [10.0, 0.4, 25.0]
primitive = "wheel"
instances = [
    { translation = [3.9, 0.7, 2.2] },
    { translation = [3.9, 0.7, -2.2], rotation = [180.0, 0.0, 1.0, 0.0] },
]
"#).unwrap();

        assert_eq!(opts.models.len(), 2);
        assert_eq!(opts.models[0], ModelOptions::Terrain {
            path: PathBuf::from("taganka8.glb"),
            scale: 10.,
        });
        match &opts.models[1] {
            ModelOptions::Instanced { primitive, instances, .. } => {
                assert_eq!(primitive, "wheel");
                assert_eq!(instances.len(), 2);
                assert_eq!(instances[0].rotation, None);
                assert_eq!(instances[1].rotation, Some([180., 0., 1., 0.]));
            }
            other => panic!("unexpected {other:?}"),
        }

        let models = opts.build_models();
        assert_eq!(models[1].path(), Path::new("paz3205.glb"));
    }

    #[test]
    fn terrain_scale_defaults_to_one() {
        let opts: ViewerOptions = toml::from_str("[[models]]\nkind = \"terrain\"\npath = \"t.glb\"").unwrap();
        assert_eq!(opts.models[0], ModelOptions::Terrain { path: "t.glb".into(), scale: 1. });
    }
}
