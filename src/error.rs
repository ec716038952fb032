//! Error types for the orrery.
//!
//! Scene configuration problems are reported as [`SceneError`] and are
//! meant to stop the program at startup, naming the body at fault. GPU and
//! window failures are wrapped by [`AppError`].

use std::fmt;
use std::path::PathBuf;

/// Errors found while loading, validating or registering a scene.
#[derive(Debug)]
pub enum SceneError {
    /// Failed to read the scene file.
    Io { path: PathBuf, source: std::io::Error },
    /// The scene document is not valid JSON for the expected schema.
    Json(serde_json::Error),
    /// Two bodies share a name.
    DuplicateName { body: String },
    /// A body names a parent that does not exist in the scene.
    UnknownParent { body: String, parent: String },
    /// A body was registered with a parent handle that is not registered yet.
    UnregisteredParent { body: String },
    /// Following parent links from this body leads back to it.
    ParentCycle { body: String },
    /// A moon without a parent.
    MissingParent { body: String },
    /// A star with a parent.
    UnexpectedParent { body: String },
    /// Both `orbit_radius` and `offset` were given.
    ConflictingOffset { body: String },
    /// A numeric field is NaN, infinite, or out of its allowed range.
    InvalidParameter {
        body: String,
        field: &'static str,
        value: f32,
    },
    /// The lighting falloff radius must be finite and strictly positive.
    InvalidFalloffRadius(f32),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io { path, source } => {
                write!(f, "Failed to read scene file '{}': {}", path.display(), source)
            }
            SceneError::Json(e) => write!(f, "Invalid scene description: {}", e),
            SceneError::DuplicateName { body } => {
                write!(f, "Body '{}' is defined more than once", body)
            }
            SceneError::UnknownParent { body, parent } => {
                write!(f, "Body '{}' names unknown parent '{}'", body, parent)
            }
            SceneError::UnregisteredParent { body } => write!(
                f,
                "Body '{}' references a parent that has not been registered yet; register parents before their dependents",
                body
            ),
            SceneError::ParentCycle { body } => {
                write!(f, "Body '{}' is part of a parent cycle", body)
            }
            SceneError::MissingParent { body } => {
                write!(f, "Moon '{}' must name a parent body", body)
            }
            SceneError::UnexpectedParent { body } => {
                write!(f, "Star '{}' cannot have a parent body", body)
            }
            SceneError::ConflictingOffset { body } => write!(
                f,
                "Body '{}' sets both 'orbit_radius' and 'offset'; use one",
                body
            ),
            SceneError::InvalidParameter { body, field, value } => {
                write!(f, "Body '{}' has invalid {}: {}", body, field, value)
            }
            SceneError::InvalidFalloffRadius(radius) => write!(
                f,
                "Lighting falloff radius must be finite and greater than zero, got {}",
                radius
            ),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io { source, .. } => Some(source),
            SceneError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::Json(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur during texture loading.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode the image.
    ImageLoad(image::ImageError),
    /// Failed to read file from disk.
    Io(std::io::Error),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "Failed to load image: {}", e),
            TextureError::Io(e) => write!(f, "Failed to read texture file: {}", e),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

/// Errors that can stop the viewer.
#[derive(Debug)]
pub enum AppError {
    /// The scene could not be built.
    Scene(SceneError),
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scene(e) => write!(f, "Scene error: {}", e),
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Scene(e) => Some(e),
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        AppError::Scene(e)
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_errors_name_the_body() {
        let err = SceneError::UnknownParent {
            body: "moon".into(),
            parent: "earht".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'moon'"));
        assert!(msg.contains("'earht'"));

        let err = SceneError::InvalidParameter {
            body: "mars".into(),
            field: "orbit_speed",
            value: f32::NAN,
        };
        assert!(err.to_string().contains("orbit_speed"));
    }

    #[test]
    fn test_app_error_wraps_scene_error() {
        let err: AppError = SceneError::MissingParent { body: "luna".into() }.into();
        assert!(matches!(err, AppError::Scene(SceneError::MissingParent { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }
}
