use core::ops;
use core::fmt;

use bytemuck::{Pod, Zeroable};

use crate::vec::{Vec3, Vec4};
use crate::quat::Quat;

/// Poses closer than this are treated as degenerate by `look_at`.
pub const EPSILON: f32 = 0.000001;

/// Column-major 4x4 matrix. `e[c][r]` is column `c`, row `r`, which is
/// element `4 * c + r` of the flat array handed to the GPU.
///
/// Column-vector convention throughout: `v' = M * v`, so in `A * B` the
/// transform `B` is applied first.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat4 {
    pub e: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        e: [
            [1., 0., 0., 0.],
            [0., 1., 0., 0.],
            [0., 0., 1., 0.],
            [0., 0., 0., 1.],
        ],
    };

    #[inline]
    pub fn zero() -> Mat4 {
        Mat4 { e: [[0.; 4]; 4] }
    }

    #[inline]
    pub fn identity() -> Mat4 {
        Mat4::IDENTITY
    }

    #[inline]
    pub fn from_cols_array(a: &[f32; 16]) -> Mat4 {
        bytemuck::cast(*a)
    }

    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        bytemuck::cast(*self)
    }

    #[inline]
    pub fn column(&self, c: usize) -> Vec4 {
        Vec4::from_slice(&self.e[c])
    }

    #[inline]
    pub fn row(&self, r: usize) -> Vec4 {
        Vec4::new(self.e[0][r], self.e[1][r], self.e[2][r], self.e[3][r])
    }

    /// Transforms a position (w = 1). No perspective divide.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).truncate()
    }

    pub fn translation(v: Vec3) -> Mat4 {
        let mut m = Mat4::identity();
        m.e[3][0..3].copy_from_slice(&v.to_slice());
        m
    }

    pub fn scaling(v: Vec3) -> Mat4 {
        let vv = v.to_slice();

        let mut m = Mat4::identity();
        for i in 0..3 {
            m.e[i][i] = vv[i];
        }
        m
    }

    /// Rotation of `degrees` about `axis`.
    ///
    /// An axis with exactly one non-zero component uses the closed-form
    /// cardinal rotation (the sign of that component flips the sense).
    /// Anything else is normalized and goes through the general formula. A
    /// zero axis gives the identity.
    pub fn rotation(degrees: f32, axis: Vec3) -> Mat4 {
        let angle = degrees.to_radians();
        let mut s = angle.sin();
        let c = angle.cos();

        let mut m = Mat4::identity();
        match (axis.x != 0., axis.y != 0., axis.z != 0.) {
            (true, false, false) => {
                if axis.x < 0. {
                    s = -s;
                }
                m.e[1][1] = c;
                m.e[2][1] = -s;
                m.e[1][2] = s;
                m.e[2][2] = c;
            }
            (false, true, false) => {
                if axis.y < 0. {
                    s = -s;
                }
                m.e[0][0] = c;
                m.e[2][0] = s;
                m.e[0][2] = -s;
                m.e[2][2] = c;
            }
            (false, false, true) => {
                if axis.z < 0. {
                    s = -s;
                }
                m.e[0][0] = c;
                m.e[1][0] = -s;
                m.e[0][1] = s;
                m.e[1][1] = c;
            }
            (false, false, false) => {}
            _ => m = Mat4::axis_angle(axis.normalized(), angle),
        }
        m
    }

    /// Rodrigues rotation about a unit `axis` by `angle` radians.
    fn axis_angle(axis: Vec3, angle: f32) -> Mat4 {
        let a = axis.x;
        let b = axis.y;
        let c = axis.z;

        let cos_alpha = angle.cos();
        let sin_alpha = angle.sin();

        let k = 1. - cos_alpha;

        let mut m = Mat4::identity();
        m.e[0][0] = a * a * k + cos_alpha;
        m.e[1][1] = b * b * k + cos_alpha;
        m.e[2][2] = c * c * k + cos_alpha;

        m.e[0][1] = a * b * k + c * sin_alpha;
        m.e[0][2] = a * c * k - b * sin_alpha;
        m.e[1][2] = b * c * k + a * sin_alpha;

        m.e[1][0] = a * b * k - c * sin_alpha;
        m.e[2][0] = a * c * k + b * sin_alpha;
        m.e[2][1] = b * c * k - a * sin_alpha;

        m
    }

    /// Symmetric-frustum perspective projection, OpenGL clip conventions
    /// (z in [-1, 1], camera looking down -z).
    pub fn perspective_projection(fov_degrees: f32, aspect: f32, near: f32,
                                  far: f32) -> Mat4 {
        let z_range = near - far;
        let tan_half_fov = (fov_degrees.to_radians() / 2.).tan();

        let mut m = Mat4::zero();
        m.e[0][0] = 1. / (tan_half_fov * aspect);
        m.e[1][1] = 1. / tan_half_fov;
        m.e[2][2] = (near + far) / z_range;
        m.e[2][3] = -1.;
        m.e[3][2] = 2. * far * near / z_range;
        m
    }

    /// View matrix for a camera at `eye` looking at `center`. Returns the
    /// identity when the two points (nearly) coincide.
    pub fn view(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
        let n = eye - center;
        if n.length() < EPSILON {
            return Mat4::identity();
        }

        let n = n.normalized();
        let u = up.cross(n).normalized();
        let v = n.cross(u).normalized();

        let mut m = Mat4::identity();
        m.e[0][0] = u.x;
        m.e[1][0] = u.y;
        m.e[2][0] = u.z;

        m.e[0][1] = v.x;
        m.e[1][1] = v.y;
        m.e[2][1] = v.z;

        m.e[0][2] = n.x;
        m.e[1][2] = n.y;
        m.e[2][2] = n.z;

        m.e[3][0] = -u.dot(eye);
        m.e[3][1] = -v.dot(eye);
        m.e[3][2] = -n.dot(eye);
        m
    }

    /// `self = self * m`: `m` acts on vertices before the current transform.
    pub fn multiply_right(&mut self, m: &Mat4) -> &mut Self {
        *self = *self * *m;
        self
    }

    /// `self = m * self`: `m` acts on vertices after the current transform.
    pub fn multiply_left(&mut self, m: &Mat4) -> &mut Self {
        *self = *m * *self;
        self
    }

    // The chaining builders below all prepend (multiply-left), so the
    // operation called last is the last one applied to a vertex.

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.multiply_left(&Mat4::translation(Vec3::new(dx, dy, dz)))
    }

    pub fn scale(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.multiply_left(&Mat4::scaling(Vec3::new(dx, dy, dz)))
    }

    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        self.multiply_left(&Mat4::rotation(degrees, Vec3::new(x, y, z)))
    }

    pub fn rotate_with_quaternion(&mut self, x: f32, y: f32, z: f32, w: f32)
        -> &mut Self {
        self.multiply_left(&Quat::new(x, y, z, w).to_mat4())
    }

    pub fn perspective(&mut self, fov_degrees: f32, aspect: f32, near: f32,
                       far: f32) -> &mut Self {
        self.multiply_left(&Mat4::perspective_projection(fov_degrees, aspect,
                                                         near, far))
    }

    /// Prepends the view matrix for `eye`/`center`/`up`. A degenerate pose
    /// resets the whole matrix to the identity instead.
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> &mut Self {
        if (eye - center).length() < EPSILON {
            *self = Mat4::identity();
            return self;
        }
        self.multiply_left(&Mat4::view(eye, center, up))
    }
}

impl ops::Mul<Mat4> for Mat4 {
    type Output = Mat4;

    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut m = Mat4::zero();

        for j in 0..4 {
            let b = rhs.column(j);
            for i in 0..4 {
                m.e[j][i] = Vec4::dot(self.row(i), b);
            }
        }
        m
    }
}

impl ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(rhs),
            self.row(1).dot(rhs),
            self.row(2).dot(rhs),
            self.row(3).dot(rhs),
        )
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prec = f.precision().unwrap_or(3);
        write!(f, "Mat4[")?;
        for r in 0..4 {
            if r > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{:.prec$} {:.prec$} {:.prec$} {:.prec$}",
                   self.e[0][r], self.e[1][r], self.e[2][r], self.e[3][r],
                   prec = prec)?;
        }
        write!(f, "]")
    }
}
