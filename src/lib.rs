//! # Orrery
//!
//! An interactive 3D solar system: a star, orbiting planets and their
//! moons, rendered with wgpu and toured with a free-fly camera.
//!
//! ## Quick Start
//!
//! ```ignore
//! use orrery::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let mut config = SceneConfig::default();
//!     config.simulation.time_scale = 2.0;
//!     Viewer::new(config).run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Bodies
//!
//! Every body is a [`Star`], a [`Planet`] or a [`Moon`], each carrying
//! [`OrbitalParameters`]: an offset from its pivot, orbit and spin speeds,
//! an axial tilt and a scale. Moons (and optionally planets) name a parent
//! by [`BodyHandle`].
//!
//! ### Transforms
//!
//! Each frame a body computes two matrices from simulation time:
//!
//! - the **non-spin** matrix: orbit revolution, offset and tilt, placed
//!   under the parent's non-spin matrix;
//! - the **spin** matrix: the non-spin matrix plus spin and scale, which is
//!   what gets drawn.
//!
//! Children read only the non-spin matrix, so a moon follows its planet's
//! orbit but not its day.
//!
//! ### Frames
//!
//! [`Orrery`] owns the [`SimulationClock`] and the [`BodyRegistry`]. Each
//! frame it advances the clock, recomputes bodies parents-first, and hands
//! draw commands to a [`FrameSink`]:
//!
//! ```ignore
//! let mut orrery = SceneConfig::default().build()?;
//! let mut recorder = FrameRecorder::default();
//! orrery.frame(1.0 / 60.0, &FrameContext::default(), &mut recorder);
//! ```
//!
//! ## Scene Files
//!
//! Scenes are JSON; see [`config`] for the format.

pub mod body;
pub mod compose;
pub mod config;
mod error;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod lighting;
pub mod mesh;
pub mod registry;
pub mod shader;
pub mod textures;
pub mod time;
mod window;

pub use body::{Body, BodyHandle, BodyKind, Moon, OrbitalParameters, Planet, RenderHandle, Shading, Star};
pub use compose::{compose, Transforms};
pub use config::SceneConfig;
pub use error::{AppError, GpuError, SceneError, TextureError};
pub use frame::{DrawCommand, FrameContext, FrameRecorder, FrameSink, Orrery};
pub use glam::{Mat4, Vec3};
pub use lighting::{Attenuation, FrameLighting, Lighting};
pub use registry::BodyRegistry;
pub use time::{FrameTimer, SimulationClock};
pub use window::Viewer;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use orrery::prelude::*;
/// ```
pub mod prelude {
    pub use crate::body::{BodyHandle, BodyKind, Moon, OrbitalParameters, Planet, RenderHandle, Star};
    pub use crate::config::SceneConfig;
    pub use crate::error::{AppError, SceneError};
    pub use crate::frame::{FrameContext, FrameRecorder, FrameSink, Orrery};
    pub use crate::time::SimulationClock;
    pub use crate::window::Viewer;
    pub use crate::{Mat4, Vec3};
}
