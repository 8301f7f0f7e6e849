//! Model-view / projection state for a single spinning object.
//!
//! The model-view matrix is the only mutable piece; projection and rotation
//! axis are fixed at construction. Matrices are column-major and upload
//! directly into WGSL `mat4x4<f32>` uniforms.

use glam::{Mat3, Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("rotation axis must be finite and non-zero")]
    DegenerateAxis,
}

/// Perspective projection with wgpu's `[0, 1]` clip-space depth.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y, aspect.max(f32::EPSILON), near, far)
}

/// Projection parameters shared by every demo.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        perspective(self.fov_y, aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformState {
    model_view: Mat4,
    projection: Mat4,
    axis: Vec3,
}

impl TransformState {
    /// Builds the state; `axis` is normalized here.
    pub fn new(projection: Mat4, model_view: Mat4, axis: Vec3) -> Result<Self, TransformError> {
        let axis = axis.try_normalize().ok_or(TransformError::DegenerateAxis)?;
        Ok(Self {
            model_view,
            projection,
            axis,
        })
    }

    /// Model-view that only translates by `offset`.
    pub fn translated(projection: Mat4, offset: Vec3, axis: Vec3) -> Result<Self, TransformError> {
        Self::new(projection, Mat4::from_translation(offset), axis)
    }

    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Normalized rotation axis.
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Composes a rotation of `angle` radians about the axis onto the current
    /// model-view (`M = M * R`), so successive calls accumulate.
    pub fn rotate(&mut self, angle: f32) {
        if angle == 0.0 {
            return;
        }
        self.model_view *= Mat4::from_axis_angle(self.axis, angle);
    }

    /// Upper-left 3x3 of the model-view matrix.
    pub fn rotation_part(&self) -> Mat3 {
        Mat3::from_mat4(self.model_view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn state() -> TransformState {
        TransformState::translated(
            Projection::default().matrix(640.0 / 480.0),
            Vec3::new(0.0, 0.0, -8.0),
            Vec3::new(0.0, 1.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn axis_is_normalized() {
        let s = state();
        assert!((s.axis().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_axis_is_rejected() {
        let err = TransformState::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO).unwrap_err();
        assert_eq!(err, TransformError::DegenerateAxis);
    }

    #[test]
    fn zero_angle_is_a_no_op() {
        let mut s = state();
        let before = s.model_view();
        s.rotate(0.0);
        assert_eq!(s.model_view(), before);
    }

    #[test]
    fn rotation_keeps_translation() {
        let mut s = state();
        s.rotate(1.234);
        assert!(s.model_view().w_axis.abs_diff_eq(glam::Vec4::new(0.0, 0.0, -8.0, 1.0), 1e-6));
    }

    #[test]
    fn rotations_accumulate() {
        let mut a = state();
        a.rotate(FRAC_PI_2);
        a.rotate(FRAC_PI_2);

        let mut b = state();
        b.rotate(PI);

        assert!(a.model_view().abs_diff_eq(b.model_view(), 1e-5));
    }

    #[test]
    fn full_turn_restores_rotation_part() {
        let mut s = state();
        let start = s.rotation_part();
        s.rotate(TAU);
        assert!(s.rotation_part().abs_diff_eq(start, 1e-5));
    }

    #[test]
    fn projection_is_fixed() {
        let mut s = state();
        let p = s.projection();
        s.rotate(0.5);
        assert_eq!(s.projection(), p);
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let p = Projection::default().matrix(1.0);
        let clip = p * glam::Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-5);
    }
}
