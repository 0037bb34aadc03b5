use math::{
    vec::{Vec2, Vec3},
    mat::Mat4,
};
use serde::{Deserialize, Serialize};

/// Perspective projection parameters. `fov` is the vertical field of view
/// in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.5,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_projection(self.fov, self.aspect, self.near, self.far)
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Orbit camera around a `center` point.
///
/// Requests that would leave the allowed range are clamped or dropped
/// without reporting anything: zoom past `max_elevation` is ignored, zoom
/// under `min_elevation` is clamped, and a rotation that would put the eye
/// below `min_eye_height` is ignored.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    eye: Vec3,
    center: Vec3,
    up: Vec3,

    /// Closest allowed eye-to-center distance.
    pub min_elevation: f32,
    /// Farthest allowed eye-to-center distance.
    pub max_elevation: f32,
    /// Below this angle (radians) between to-eye and up, upward vertical
    /// orbit is disabled.
    pub max_camera_angle: f32,
    /// Lowest world height the eye may be rotated to.
    pub min_eye_height: f32,
    /// Orbit angle per pixel of pointer motion.
    pub degrees_per_pixel: f32,

    projection: Projection,
    viewport: Viewport,
}

impl OrbitCamera {
    pub fn new(eye: Vec3, center: Vec3, projection: Projection,
               viewport: Viewport) -> OrbitCamera {
        Self {
            eye,
            center,
            up: Vec3::Y,
            min_elevation: 4.0,
            max_elevation: 100.0,
            max_camera_angle: 0.5,
            min_eye_height: 2.0,
            degrees_per_pixel: 1.0,
            projection,
            viewport,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn to_eye(&self) -> Vec3 {
        self.eye - self.center
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::view(self.eye, self.center, self.up)
    }

    /// Angle of the horizontal part of `to_eye` measured from world +Z
    /// about `up`. Zero when the camera looks straight down.
    fn heading(&self, to_eye: Vec3) -> f32 {
        let horizontal = Vec3::new(to_eye.x, 0., to_eye.z);
        if horizontal.length() == 0. {
            return 0.;
        }
        horizontal.angle_between(Vec3::Z, self.up)
    }

    /// Pans the whole rig (eye and center) by a pixel delta.
    ///
    /// Pixels are converted to world units on the near plane, scaled by
    /// `|to_eye| / near` so the ground under the cursor tracks the pointer at
    /// any zoom level, then turned into the camera's heading.
    pub fn pan(&mut self, delta: Vec2) {
        let to_eye = self.to_eye();
        let angle = self.heading(to_eye);

        let Projection { fov, aspect, near, .. } = self.projection;
        let yh = near * (fov / 2.).to_radians().tan() * 2.;
        let yw = yh * aspect;
        let ratio = to_eye.length() / near;

        let dx = delta.x * yw / self.viewport.width.max(1) as f32 * ratio;
        let dy = delta.y * yh / self.viewport.height.max(1) as f32 * ratio;

        let (sin, cos) = angle.sin_cos();
        let rotated = Vec2::new(
            dx * cos + dy * sin,
            -dx * sin + dy * cos,
        );

        let offset = Vec3::new(-rotated.x, 0., -rotated.y);
        self.eye += offset;
        self.center += offset;
    }

    /// Orbits the eye around the center.
    ///
    /// `delta.x` turns about `up`. `delta.y` tilts about the horizontal axis
    /// perpendicular to the heading, but only while the to-eye vector is
    /// further than `max_camera_angle` from `up`, or when tilting down.
    pub fn rotate(&mut self, delta: Vec2) {
        let to_eye = self.to_eye();
        let mut rotation = Mat4::rotation(-delta.x * self.degrees_per_pixel, self.up);

        let to_eye_up_angle = to_eye.angle_between(self.up, self.up);
        if to_eye_up_angle.abs() > self.max_camera_angle || delta.y < 0. {
            // axis lies in the ground plane, perpendicular to the heading
            let angle = self.heading(to_eye);
            let (sin, cos) = angle.sin_cos();
            rotation.rotate(-delta.y * self.degrees_per_pixel, cos, 0., -sin);
        }

        let rotated = to_eye.transform(&rotation);
        if self.center.y + rotated.y < self.min_eye_height {
            return;
        }
        self.eye = self.center + rotated;
    }

    /// Moves the eye along the to-eye direction. The center never moves.
    pub fn zoom(&mut self, extra_magnitude: f32) {
        let to_eye = self.to_eye();
        let mut magnitude = to_eye.length() + extra_magnitude;
        if magnitude > self.max_elevation {
            return;
        }
        if magnitude < self.min_elevation {
            magnitude = self.min_elevation;
        }
        self.eye = self.center + to_eye.normalized() * magnitude;
    }
}
