//! # Vector and homogeneous-matrix helpers
//!
//! Thin layer over [`nalgebra`] giving the engine its three math primitives:
//!
//! - [`Vector3<f64>`] for positions, velocities and rotation axes,
//! - [`Matrix4<f64>`] for homogeneous frame transforms (rotation + translation),
//! - [`Vector2<f64>`] for small scalar pairs such as `(ρ·sinφ′, ρ·cosφ′)`.
//!
//! ## Conventions
//!
//! Rotations are **active** (they rotate the vector, not the frame) and act on column vectors:
//! `v_to = M · v_from`. Matrices relating two reference frames are named
//! `mat_<from>_to_<to>` everywhere in the crate; composing `A · B` applies `B` first.
//!
//! Degenerate inputs resolve locally: normalising a zero vector yields the zero vector and the
//! inverse of a singular matrix yields the identity.

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Unit, Vector3};

/// Cartesian axis selector for elementary rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Elementary active rotation of `angle` radians about `axis`, as a 3×3 matrix.
pub fn rotation3(axis: Axis, angle: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&axis.unit(), angle).into()
}

/// Elementary active rotation of `angle` radians about `axis`, lifted to homogeneous form.
pub fn rotation4(axis: Axis, angle: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&axis.unit(), angle).to_homogeneous()
}

/// Shorthand for [`rotation4`] about X.
pub fn xrotation(angle: f64) -> Matrix4<f64> {
    rotation4(Axis::X, angle)
}

/// Shorthand for [`rotation4`] about Y.
pub fn yrotation(angle: f64) -> Matrix4<f64> {
    rotation4(Axis::Y, angle)
}

/// Shorthand for [`rotation4`] about Z.
pub fn zrotation(angle: f64) -> Matrix4<f64> {
    rotation4(Axis::Z, angle)
}

/// Homogeneous translation by `offset`.
pub fn translation(offset: &Vector3<f64>) -> Matrix4<f64> {
    Matrix4::new_translation(offset)
}

/// Lift a 3×3 rotation into a homogeneous matrix without translation.
pub fn homogeneous(rotation: &Matrix3<f64>) -> Matrix4<f64> {
    rotation.to_homogeneous()
}

/// Apply the full transform (rotation and translation) to a point.
pub fn transform_point(m: &Matrix4<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    m.transform_point(&Point3::from(*v)).coords
}

/// Apply only the rotational part of the transform to a direction.
pub fn transform_vector(m: &Matrix4<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    m.fixed_view::<3, 3>(0, 0) * v
}

/// Inverse of a homogeneous transform; a singular matrix yields the identity.
pub fn inverse_or_identity(m: &Matrix4<f64>) -> Matrix4<f64> {
    match m.try_inverse() {
        Some(inv) => inv,
        None => {
            log::warn!("singular 4x4 transform, substituting identity for its inverse");
            Matrix4::identity()
        }
    }
}

/// Unit vector along `v`, or the zero vector when `v` has zero length.
pub fn safe_normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm == 0.0 {
        Vector3::zeros()
    } else {
        v / norm
    }
}

/// Angle in radians between two vectors, zero when either has zero length.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    // atan2 form stays accurate for nearly parallel vectors
    a.cross(b).norm().atan2(a.dot(b))
}
