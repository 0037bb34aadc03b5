pub mod vec;
pub mod mat;
pub mod quat;

pub use vec::{Vec2, Vec3, Vec4};
pub use mat::Mat4;
pub use quat::Quat;

#[cfg(test)]
mod tests {

    #[test]
    fn test() {
        use crate::vec::{Vec2, Vec3};
        use crate::mat::Mat4;

        let x = Vec2::new(10.0, 2.0);
        let mut z = x;
        z += Vec2::from_scalar(1.0);
        assert_eq!(z, Vec2::new(11.0, 3.0));

        let mut m = Mat4::identity();
        m.rotate(90., 0., 0., 1.).translate(1., 2., 3.);
        let p = m.transform_point(Vec3::X);
        assert!((p - Vec3::new(1., 3., 3.)).length() < 1e-5);

        println!("{:.2} {}", z, m);
    }
}
