use core::ops;
use core::ops::{Add, Sub, Mul, Div, Neg, AddAssign, SubAssign, MulAssign, DivAssign};
use core::fmt;
use core::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

use crate::mat::Mat4;

macro_rules! vec_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: self.$e.$func(rhs.$e), )* }
            }
        }
    }
}

macro_rules! vec_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            #[inline]
            fn $func(&mut self, rhs: $v) {
                $( self.$e.$func(rhs.$e); )*
            }
        }
    }
}

macro_rules! scalar_op_impl {
    ($trait: ident, $func: ident, $v: ident, $t: ident, $($e: ident),*) => {

        impl ops::$trait<$t> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $t) -> $v {
                $v { $( $e: self.$e.$func(rhs), )* }
            }
        }

        impl ops::$trait<$v> for $t {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: self.$func(rhs.$e), )* }
            }
        }
    }
}

macro_rules! scalar_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $t: ident, $($e: ident),*) => {

        impl ops::$trait<$t> for $v {
            #[inline]
            fn $func(&mut self, rhs: $t) {
                $( self.$e.$func(rhs); )*
            }
        }
    }
}

macro_rules! vec_impl {
    ($v: ident, $t: ident, $n: expr, $($e: ident),*) => {

        #[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[repr(C)]
        pub struct $v {
            $( pub $e : $t, )*
        }

        impl $v {
            pub const ZERO: $v = $v { $( $e: 0.0, )* };

            #[inline]
            pub const fn new($( $e: $t, )*) -> $v {
                $v { $( $e, )* }
            }

            #[inline]
            pub fn from_scalar(a: $t) -> $v {
                $v { $( $e : a, )* }
            }

            #[inline]
            pub fn from_slice(a: &[$t; $n]) -> $v {
                bytemuck::cast(*a)
            }

            #[inline]
            pub fn to_slice(self) -> [$t; $n] {
                bytemuck::cast(self)
            }

            #[inline]
            pub fn dot(self, b: $v) -> $t {
                // Adding negative zero (-0.0) is a nop in IEEE 754 floating
                // point, while adding positive zero can change the sign of
                // negative zero, thus llvm only optimizes out (-0.0).
                $( self.$e * b.$e + )* (-0.0)
            }

            #[inline]
            pub fn length2(self) -> $t {
                $v::dot(self, self)
            }

            /// Magnitude of the vector.
            #[inline]
            pub fn length(self) -> $t {
                $v::length2(self).sqrt()
            }

            /// Unit vector in the same direction, or the zero vector when
            /// the length is zero.
            #[inline]
            pub fn normalized(self) -> $v {
                let length = $v::length(self);
                if length == 0.0 {
                    return $v::ZERO;
                }
                self / length
            }

            #[inline]
            pub fn scaled(self, s: $t) -> $v {
                self * s
            }

            /// All components negated.
            #[inline]
            pub fn inverted(self) -> $v {
                -self
            }
        }

        impl ops::Neg for $v {
            type Output = $v;

            fn neg(self) -> $v {
                $v { $( $e: self.$e.neg(), )* }
            }
        }

        impl fmt::Display for $v {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($v),
                        [$(
                           format!("{:.prec$}", self.$e, prec = f.precision().unwrap_or(3)),
                        )*].join(", "))
            }
        }

        vec_op_impl!(Add, add, $v, $($e),*);
        vec_op_impl!(Sub, sub, $v, $($e),*);

        vec_assign_op_impl!(AddAssign, add_assign, $v, $($e),*);
        vec_assign_op_impl!(SubAssign, sub_assign, $v, $($e),*);

        scalar_op_impl!(Mul, mul, $v, $t, $($e),*);
        scalar_op_impl!(Div, div, $v, $t, $($e),*);

        scalar_assign_op_impl!(MulAssign, mul_assign, $v, $t, $($e),*);
        scalar_assign_op_impl!(DivAssign, div_assign, $v, $t, $($e),*);
    }
}

vec_impl!(Vec2, f32, 2, x, y);
vec_impl!(Vec3, f32, 3, x, y, z);
vec_impl!(Vec4, f32, 4, x, y, z, w);

impl Vec3 {
    pub const X: Vec3 = Vec3::new(1., 0., 0.);
    pub const Y: Vec3 = Vec3::new(0., 1., 0.);
    pub const Z: Vec3 = Vec3::new(0., 0., 1.);

    #[inline]
    pub fn cross(self, b: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * b.z - self.z * b.y,
            y: self.z * b.x - self.x * b.z,
            z: self.x * b.y - self.y * b.x,
        }
    }

    /// `self · (v1 × v2)`
    #[inline]
    pub fn triple(self, v1: Vec3, v2: Vec3) -> f32 {
        self.dot(v1.cross(v2))
    }

    /// Signed angle from `self` to `other` in `[0, 2π)`.
    ///
    /// `acos` alone cannot tell the two rotation senses apart, so the sign of
    /// `(-up) · (self × other)` picks between `angle` and `2π - angle`.
    /// Undefined (NaN) when either vector has zero length.
    pub fn angle_between(self, other: Vec3, up: Vec3) -> f32 {
        let cos = self.dot(other) / (self.length() * other.length());
        let angle = cos.clamp(-1.0, 1.0).acos();
        if up.inverted().triple(self, other) < 0.0 {
            return 2.0 * PI - angle;
        }
        angle
    }

    /// Applies the upper-left 3x3 block of `m`. Translation is ignored, so
    /// this is only meaningful for directions.
    pub fn transform(self, m: &Mat4) -> Vec3 {
        let e = &m.e;
        Vec3 {
            x: self.x * e[0][0] + self.y * e[1][0] + self.z * e[2][0],
            y: self.x * e[0][1] + self.y * e[1][1] + self.z * e[2][1],
            z: self.x * e[0][2] + self.y * e[1][2] + self.z * e[2][2],
        }
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

impl Vec4 {
    #[inline]
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn normalize_yields_unit_length() {
        for v in [
            Vec3::new(3., 4., 0.),
            Vec3::new(-1., 2., -7.5),
            Vec3::new(0., 0., 1e-3),
        ] {
            assert!(approx_eq(v.normalized().length(), 1.0));
        }
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn basic_arithmetic() {
        let a = Vec3::new(1., 2., 3.);
        let b = Vec3::new(4., 5., 6.);
        assert_eq!(a + b, Vec3::new(5., 7., 9.));
        assert_eq!(b - a, Vec3::new(3., 3., 3.));
        assert_eq!(a.scaled(2.), Vec3::new(2., 4., 6.));
        assert_eq!(b / 2., Vec3::new(2., 2.5, 3.));
        assert_eq!(a.inverted(), Vec3::new(-1., -2., -3.));
        assert_eq!(a.dot(b), 32.);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn triple_product_is_signed_volume() {
        assert_eq!(Vec3::Z.triple(Vec3::X, Vec3::Y), 1.);
        assert_eq!(Vec3::Z.triple(Vec3::Y, Vec3::X), -1.);
    }

    #[test]
    fn angle_between_resolves_direction_with_up() {
        let up = Vec3::Y;
        // x -> z about y: (-y) · (x × z) = (-y) · (-y) = 1, so the short angle
        let a = Vec3::X.angle_between(Vec3::Z, up);
        assert!(approx_eq(a, PI / 2.));

        let b = Vec3::Z.angle_between(Vec3::X, up);
        assert!(approx_eq(b, 3. * PI / 2.));

        let c = Vec3::X.angle_between(Vec3::X * 2., up);
        assert!(approx_eq(c, 0.));
    }

    #[test]
    fn transform_ignores_translation() {
        let m = Mat4::translation(Vec3::new(10., 20., 30.));
        assert_eq!(Vec3::new(1., 2., 3.).transform(&m), Vec3::new(1., 2., 3.));

        let s = Mat4::scaling(Vec3::new(2., 3., 4.));
        assert_eq!(Vec3::new(1., 1., 1.).transform(&s), Vec3::new(2., 3., 4.));
    }
}
