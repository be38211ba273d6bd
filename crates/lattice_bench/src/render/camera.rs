//! # 3D Camera
//!
//! Projection parameters plus a look-at pose. Matrices are derived on
//! demand; nothing is cached, since the camera is read-only once the scene
//! has been framed.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};

/// Perspective camera
///
/// # Coordinate System
/// Right-handed, Y-up world space. The camera looks from `position`
/// towards `target`; with the default pose that is down the world -Z axis.
///
/// # Invariants
/// `0 < near < far` and `0 < fov < π`. Mutators do not validate; whoever
/// frames the scene keeps these true.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    fov: f32,

    /// Distance to near clipping plane
    near: f32,

    /// Distance to far clipping plane
    far: f32,

    /// Camera position in world space (homogeneous, w = 1)
    position: Vec4,

    /// Point the camera is looking at in world space
    target: Vec3,

    /// Up vector for camera orientation
    up: Vec3,
}

impl Camera {
    /// Create a camera with explicit projection parameters and the default pose
    pub fn new(fov: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            near,
            far,
            ..Self::default()
        }
    }

    /// Vertical field of view in radians
    pub const fn field_of_view(&self) -> f32 {
        self.fov
    }

    /// Near plane distance
    pub const fn near(&self) -> f32 {
        self.near
    }

    /// Far plane distance
    pub const fn far(&self) -> f32 {
        self.far
    }

    /// Homogeneous camera position
    pub const fn position(&self) -> Vec4 {
        self.position
    }

    /// Camera position as a 3D point
    pub fn eye(&self) -> Vec3 {
        self.position.xyz()
    }

    /// Look-at point
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// Up vector
    pub const fn up(&self) -> Vec3 {
        self.up
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec4) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update the far clipping plane
    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        log::trace!("Camera far plane updated to: {}", far);
    }

    /// Point the camera at `target` with a custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.eye(), self.target, self.up)
    }

    /// Perspective projection for a render target of the given aspect ratio
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect_ratio, self.near, self.far)
    }

    /// Combined transform uploaded once per frame: P × X × V
    ///
    /// X flips view space into clip-space conventions (Y down, Z forward),
    /// so visible points end up with `w > 0` and depth in `[0, 1]`.
    pub fn view_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * Mat4::clip_coordinate_transform() * self.view_matrix()
    }
}

impl Default for Camera {
    /// 45° vertical field of view, near 0.1, far 100, three units out on +Z
    /// looking at the origin.
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 100.0,
            position: Vec4::new(0.0, 0.0, 3.0, 1.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}
