//! Free-fly camera for touring the scene.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

const MAX_PITCH_DEG: f32 = 89.0;
const MIN_FOV_DEG: f32 = 1.0;
const MAX_FOV_DEG: f32 = 45.0;

/// Direction of keyboard movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person camera: WASD to move, mouse to look, wheel to zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space eye position.
    pub position: Vec3,
    /// Horizontal look angle in degrees. 0 looks along +X, 90 along +Z.
    pub yaw: f32,
    /// Vertical look angle in degrees, clamped to ±89.
    pub pitch: f32,
    /// Vertical field of view in degrees. Smaller means more zoom.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            yaw: config.yaw_deg,
            pitch: config.pitch_deg.clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG),
            fov: config.fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG),
            near: config.near,
            far: config.far,
            speed: config.speed,
            sensitivity: config.sensitivity,
        }
    }

    /// Unit vector the camera looks along.
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    /// Unit vector to the camera's right, always horizontal.
    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    pub fn process_keyboard(&mut self, movement: Movement, dt: f32) {
        let step = self.speed * dt.max(0.0);
        match movement {
            Movement::Forward => self.position += self.front() * step,
            Movement::Backward => self.position -= self.front() * step,
            Movement::Left => self.position -= self.right() * step,
            Movement::Right => self.position += self.right() * step,
        }
    }

    /// Rotate by a mouse delta in pixels. Positive `dy` looks up.
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
    }

    /// Zoom by a wheel delta. Positive values zoom in.
    pub fn process_scroll(&mut self, dy: f32) {
        self.fov = (self.fov - dy).clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front(), Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
