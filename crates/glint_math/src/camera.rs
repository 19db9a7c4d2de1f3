use glam::{Mat4, Vec2, Vec3};

/// Per-frame camera parameters consumed by the tracer.
///
/// The tracer never builds these itself; a host computes them once per frame
/// (usually through [`Camera::params`]) and hands them to every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera space → world space
    pub camera_to_world: Mat4,
    /// Clip space → camera space
    pub inverse_projection: Mat4,
    /// Sample position inside each pixel, in [0, 1)²
    pub pixel_offset: Vec2,
}

/// Look-at camera for 3D rendering
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 60.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov_degrees(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y.to_radians();
        self
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix (camera → clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Update aspect ratio (e.g., on resolution change)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Freeze this camera into the parameters a frame is traced with.
    pub fn params(&self) -> CameraParams {
        CameraParams {
            position: self.position,
            camera_to_world: self.view_matrix().inverse(),
            inverse_projection: self.projection_matrix().inverse(),
            pixel_offset: Vec2::splat(0.5),
        }
    }
}
