use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

pub const WORLD_UP: Vec3 = Vec3::Y;

/// Smallest angle (radians) the forward vector may get to straight up or down.
/// Closer than this, `direction x up` no longer yields a usable right vector.
pub const MIN_UP_ANGLE: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("field of view must be within (0, pi) radians, got {0}")]
    InvalidFieldOfView(f32),
    #[error("aspect ratio must be positive, got {0}")]
    InvalidAspectRatio(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("initial direction must be a finite non-zero vector away from vertical, got {0}")]
    InvalidDirection(Vec3),
}

/// Camera data as the shaders see it.
///
/// `position` is padded to 16 bytes so the matrices that follow start on a
/// vec4 boundary. Matrices are column-major.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub position: [f32; 3],
    pub _padding: f32,
    pub projection_inverse: [[f32; 4]; 4],
    pub view_inverse: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(position: Vec3, projection_inverse: &Mat4, view_inverse: &Mat4) -> Self {
        Self {
            position: position.to_array(),
            _padding: 0.0,
            projection_inverse: projection_inverse.to_cols_array_2d(),
            view_inverse: view_inverse.to_cols_array_2d(),
        }
    }
}

/// Free-look state: movement and rotation only apply while `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookMode {
    #[default]
    Inactive,
    Active,
}

/// View matrix looking from `position` along `direction`, right-handed, Y up.
pub fn look_at(position: Vec3, direction: Vec3) -> Mat4 {
    Mat4::look_at_rh(position, position + direction, WORLD_UP)
}

/// Camera with orientation stored as a forward vector.
///
/// Only the inverse matrices are kept: the shader reconstructs world-space
/// rays from them directly. The projection is fixed at construction.
#[derive(Debug, Clone)]
pub struct Camera {
    pub(crate) position: Vec3,
    pub(crate) direction: Vec3,
    pub(crate) view_inverse: Mat4,
    pub(crate) projection_inverse: Mat4,
    pub(crate) uniform: CameraUniform,
    pub(crate) look_mode: LookMode,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Result<Self, CameraError> {
        let CameraConfig { fov_y, z_near, z_far, .. } = *config;

        if !(fov_y.is_finite() && fov_y > 0.0 && fov_y < std::f32::consts::PI) {
            return Err(CameraError::InvalidFieldOfView(fov_y));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(CameraError::InvalidAspectRatio(aspect));
        }
        if !(z_near.is_finite() && z_far.is_finite() && z_near > 0.0 && z_near < z_far) {
            return Err(CameraError::InvalidClipPlanes { near: z_near, far: z_far });
        }
        let direction = config
            .direction
            .try_normalize()
            .ok_or(CameraError::InvalidDirection(config.direction))?;
        if direction.dot(WORLD_UP).abs() > MIN_UP_ANGLE.cos() {
            return Err(CameraError::InvalidDirection(config.direction));
        }

        let projection_inverse = Mat4::perspective_rh(fov_y, aspect, z_near, z_far).inverse();
        let view_inverse = look_at(config.position, direction).inverse();

        tracing::info!(
            position = ?config.position,
            ?direction,
            fov_deg = fov_y.to_degrees(),
            aspect,
            "camera initialized"
        );

        Ok(Self {
            position: config.position,
            direction,
            view_inverse,
            projection_inverse,
            uniform: CameraUniform::new(config.position, &projection_inverse, &view_inverse),
            look_mode: LookMode::Inactive,
        })
    }

    pub fn position(&self) -> Vec3 { self.position }

    pub fn direction(&self) -> Vec3 { self.direction }

    /// Right vector, `direction x up`. Derived on demand, never stored.
    pub fn right(&self) -> Vec3 {
        self.direction.cross(WORLD_UP).normalize_or_zero()
    }

    pub fn view_inverse(&self) -> Mat4 { self.view_inverse }

    pub fn projection_inverse(&self) -> Mat4 { self.projection_inverse }

    pub fn view(&self) -> Mat4 { self.view_inverse.inverse() }

    pub fn projection(&self) -> Mat4 { self.projection_inverse.inverse() }

    pub fn uniform(&self) -> CameraUniform { self.uniform }

    pub fn look_mode(&self) -> LookMode { self.look_mode }

    /// Recompute the view inverse and the uniform from the current pose.
    pub(crate) fn refresh(&mut self) {
        self.view_inverse = look_at(self.position, self.direction).inverse();
        self.uniform = CameraUniform::new(self.position, &self.projection_inverse, &self.view_inverse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(size_of::<CameraUniform>(), 144);
        assert_eq!(offset_of!(CameraUniform, position), 0);
        assert_eq!(offset_of!(CameraUniform, projection_inverse), 16);
        assert_eq!(offset_of!(CameraUniform, view_inverse), 80);
    }

    #[test]
    fn initial_state() {
        let cam = Camera::new(&CameraConfig::default(), 1.0).unwrap();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.direction(), Vec3::NEG_Z);
        assert_eq!(cam.look_mode(), LookMode::Inactive);
        assert!(cam.right().abs_diff_eq(Vec3::X, 1e-6));

        let uniform = cam.uniform();
        assert_eq!(uniform.position, [0.0, 0.0, 3.0]);
        assert_eq!(uniform.view_inverse, cam.view_inverse().to_cols_array_2d());
        assert_eq!(uniform.projection_inverse, cam.projection_inverse().to_cols_array_2d());
    }

    #[test]
    fn view_inverse_places_camera_at_position() {
        let cam = Camera::new(&CameraConfig::default(), 1.0).unwrap();
        // The inverse view maps the eye-space origin back to the camera position.
        let eye = cam.view_inverse().transform_point3(Vec3::ZERO);
        assert!(eye.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
        // Eye-space forward is -Z.
        let fwd = cam.view_inverse().transform_vector3(Vec3::NEG_Z);
        assert!(fwd.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn look_at_double_inverse_round_trip() {
        let position = Vec3::new(1.5, -2.0, 7.25);
        let direction = Vec3::new(0.3, 0.2, -0.9).normalize();
        let view = look_at(position, direction);
        let back = view.inverse().inverse();
        assert!(back.abs_diff_eq(view, 1e-4));
    }

    #[test]
    fn direction_is_normalized_on_construction() {
        let cfg = CameraConfig { direction: Vec3::new(0.0, 0.0, -5.0), ..CameraConfig::default() };
        let cam = Camera::new(&cfg, 1.0).unwrap();
        assert!((cam.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_degenerate_projection() {
        let near_past_far = CameraConfig { z_near: 10.0, z_far: 1.0, ..CameraConfig::default() };
        assert!(matches!(
            Camera::new(&near_past_far, 1.0),
            Err(CameraError::InvalidClipPlanes { .. })
        ));

        let equal_planes = CameraConfig { z_near: 5.0, z_far: 5.0, ..CameraConfig::default() };
        assert!(Camera::new(&equal_planes, 1.0).is_err());

        let zero_fov = CameraConfig { fov_y: 0.0, ..CameraConfig::default() };
        assert_eq!(
            Camera::new(&zero_fov, 1.0).unwrap_err(),
            CameraError::InvalidFieldOfView(0.0)
        );

        assert!(matches!(
            Camera::new(&CameraConfig::default(), 0.0),
            Err(CameraError::InvalidAspectRatio(_))
        ));

        let no_direction = CameraConfig { direction: Vec3::ZERO, ..CameraConfig::default() };
        assert!(matches!(
            Camera::new(&no_direction, 1.0),
            Err(CameraError::InvalidDirection(_))
        ));

        for vertical in [Vec3::Y, Vec3::NEG_Y, Vec3::new(0.0, 2.0, -0.005)] {
            let cfg = CameraConfig { direction: vertical, ..CameraConfig::default() };
            assert_eq!(
                Camera::new(&cfg, 1.0).unwrap_err(),
                CameraError::InvalidDirection(vertical)
            );
        }
    }

    #[test]
    fn steep_direction_still_has_finite_matrices() {
        let cfg = CameraConfig { direction: Vec3::new(0.0, 1.0, -0.05), ..CameraConfig::default() };
        let cam = Camera::new(&cfg, 1.0).unwrap();
        assert!(cam.view_inverse().is_finite());
        assert!(cam.right().length() > 0.0);
    }

    #[test]
    fn projection_round_trips_through_inverse() {
        let cfg = CameraConfig::default();
        let cam = Camera::new(&cfg, 16.0 / 9.0).unwrap();
        let expected = Mat4::perspective_rh(cfg.fov_y, 16.0 / 9.0, cfg.z_near, cfg.z_far);
        assert!(cam.projection().abs_diff_eq(expected, 1e-4));
    }
}
