use core::ops;
use core::fmt;

use bytemuck::{Pod, Zeroable};

use crate::vec::Vec3;
use crate::mat::Mat4;

#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Quat::new(0., 0., 0., 1.)
    }
}

impl Quat {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// glTF order: `[x, y, z, w]`.
    #[inline]
    pub fn from_slice(a: &[f32; 4]) -> Self {
        bytemuck::cast(*a)
    }

    #[inline]
    pub fn to_slice(self) -> [f32; 4] {
        bytemuck::cast(self)
    }

    #[inline]
    pub fn norm2(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let s = (angle * 0.5).sin();
        Self {
            w: (angle * 0.5).cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// Rotation matrix of the quaternion. Input does not need to be
    /// normalized: every term is divided by the squared norm. The zero
    /// quaternion maps to the identity.
    pub fn to_mat4(self) -> Mat4 {
        let norm2 = self.norm2();
        if norm2 == 0. {
            return Mat4::identity();
        }
        let invs = 1. / norm2;

        let x = self.x;
        let y = self.y;
        let z = self.z;
        let w = self.w;

        let xy = x * y;
        let xz = x * z;
        let xw = x * w;
        let yz = y * z;
        let yw = y * w;
        let zw = z * w;
        let x_squared = x * x;
        let y_squared = y * y;
        let z_squared = z * z;
        let w_squared = w * w;

        let mut m = Mat4::identity();
        m.e[0][0] = (x_squared - y_squared - z_squared + w_squared) * invs;
        m.e[1][1] = (-x_squared + y_squared - z_squared + w_squared) * invs;
        m.e[2][2] = (-x_squared - y_squared + z_squared + w_squared) * invs;

        m.e[0][1] = 2. * (xy + zw) * invs;
        m.e[1][0] = 2. * (xy - zw) * invs;

        m.e[0][2] = 2. * (xz - yw) * invs;
        m.e[2][0] = 2. * (xz + yw) * invs;

        m.e[1][2] = 2. * (yz + xw) * invs;
        m.e[2][1] = 2. * (yz - xw) * invs;

        m
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Quat(w: {:.prec$}, x: {:.prec$}, y: {:.prec$}, z: {:.prec$})",
               self.w, self.x, self.y, self.z,
               prec = f.precision().unwrap_or(3))
    }
}

impl ops::Mul<Quat> for f32 {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            x: rhs.x * self,
            y: rhs.y * self,
            z: rhs.z * self,
            w: rhs.w * self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_quaternion() {
        assert_eq!(Quat::default().to_mat4(), Mat4::identity());
        assert_eq!(Quat::new(0., 0., 0., 0.).to_mat4(), Mat4::identity());
    }

    #[test]
    fn unnormalized_input() {
        let q = Quat::from_axis_angle(Vec3::Y, 1.2);
        let a = q.to_mat4().to_cols_array();
        let b = (3.5 * q).to_mat4().to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn slice_order_is_xyzw() {
        let q = Quat::from_slice(&[1., 2., 3., 4.]);
        assert_eq!(q, Quat::new(1., 2., 3., 4.));
        assert_eq!(q.to_slice(), [1., 2., 3., 4.]);
    }
}
