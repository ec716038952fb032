//! Declarative scene description.
//!
//! A scene is a JSON document listing the bodies plus optional window,
//! camera, lighting and simulation sections. Angles are written in degrees and
//! converted to radians when the scene is built.
//!
//! ```json
//! {
//!   "bodies": [
//!     { "name": "sun",   "kind": "star", "scale": 15.0, "emission": [1.0, 1.0, 0.0] },
//!     { "name": "earth", "kind": "planet", "orbit_radius": 60.0,
//!       "orbit_speed": 0.5, "spin_speed": 0.7, "axial_tilt_deg": 23.5 },
//!     { "name": "moon",  "kind": "moon", "parent": "earth",
//!       "orbit_radius": 3.0, "orbit_speed": 5.0, "scale": 0.1 }
//!   ]
//! }
//! ```
//!
//! Bodies may be listed in any order; [`SceneConfig::build`] registers
//! parents before their dependents and rejects unknown parents, cycles and
//! invalid numbers with an error naming the body.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::{BodyKind, Moon, OrbitalParameters, Planet, RenderHandle, Star};
use crate::error::SceneError;
use crate::frame::Orrery;
use crate::lighting::{Attenuation, Lighting};
use crate::registry::BodyRegistry;

const DEFAULT_SCENE: &str = include_str!("../assets/solar_system.json");

/// A complete scene: window, camera, lighting and bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub bodies: Vec<BodyConfig>,
    /// Directory that relative texture paths are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".into(),
            width: 1280,
            height: 800,
        }
    }
}

/// Starting state of the free camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    /// Vertical field of view.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [20.0, 0.0, -100.0],
            yaw_deg: 90.0,
            pitch_deg: 0.0,
            fov_deg: 45.0,
            near: 0.1,
            far: 500.0,
            speed: 25.0,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub constant: f32,
    pub linear: f32,
    /// Distance at which the quadratic falloff term reaches one.
    pub falloff_radius: f32,
    pub ambient: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        let lighting = Lighting::default();
        Self {
            constant: lighting.attenuation.constant,
            linear: lighting.attenuation.linear,
            falloff_radius: 60.0,
            ambient: lighting.ambient,
            specular: lighting.specular,
            shininess: lighting.shininess,
        }
    }
}

impl LightingConfig {
    /// Validate and convert to runtime lighting.
    pub fn to_lighting(&self) -> Result<Lighting, SceneError> {
        let attenuation = Attenuation::from_falloff_radius(self.constant, self.linear, self.falloff_radius)?;
        for (field, value) in [
            ("ambient", self.ambient),
            ("specular", self.specular),
            ("shininess", self.shininess),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SceneError::InvalidParameter {
                    body: "lighting".into(),
                    field,
                    value,
                });
            }
        }
        Ok(Lighting {
            attenuation,
            ambient: self.ambient,
            specular: self.specular,
            shininess: self.shininess,
        })
    }
}

/// Initial state of the simulation clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation seconds per real second.
    pub time_scale: f32,
    /// Start with the clock stopped.
    pub paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            paused: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindConfig {
    Star,
    Planet,
    Moon,
}

/// Uniform or per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleConfig {
    Uniform(f32),
    Axes([f32; 3]),
}

impl ScaleConfig {
    pub fn to_vec3(self) -> Vec3 {
        match self {
            ScaleConfig::Uniform(s) => Vec3::splat(s),
            ScaleConfig::Axes(a) => Vec3::from_array(a),
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig::Uniform(1.0)
    }
}

/// One body record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub kind: KindConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Distance from the pivot along +X. Exclusive with `offset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_radius: Option<f32>,
    /// Full offset from the pivot. Exclusive with `orbit_radius`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f32; 3]>,
    #[serde(default)]
    pub orbit_speed: f32,
    #[serde(default)]
    pub spin_speed: f32,
    #[serde(default)]
    pub axial_tilt_deg: f32,
    #[serde(default)]
    pub scale: ScaleConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathBuf>,
    #[serde(default = "default_tint")]
    pub tint: [f32; 3],
    /// Emitted colour; only meaningful for stars.
    #[serde(default = "default_tint")]
    pub emission: [f32; 3],
}

fn default_tint() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl BodyConfig {
    /// Validated orbital parameters, angles converted to radians.
    pub fn orbital_parameters(&self) -> Result<OrbitalParameters, SceneError> {
        let local_offset = match (self.orbit_radius, self.offset) {
            (Some(_), Some(_)) => {
                return Err(SceneError::ConflictingOffset {
                    body: self.name.clone(),
                })
            }
            (Some(radius), None) => {
                if radius < 0.0 {
                    return Err(self.invalid("orbit_radius", radius));
                }
                Vec3::new(radius, 0.0, 0.0)
            }
            (None, Some(offset)) => Vec3::from_array(offset),
            (None, None) => Vec3::ZERO,
        };
        let scale = self.scale.to_vec3();

        let checks = [
            ("orbit_radius", self.orbit_radius.unwrap_or(0.0)),
            ("offset.x", local_offset.x),
            ("offset.y", local_offset.y),
            ("offset.z", local_offset.z),
            ("orbit_speed", self.orbit_speed),
            ("spin_speed", self.spin_speed),
            ("axial_tilt_deg", self.axial_tilt_deg),
            ("scale.x", scale.x),
            ("scale.y", scale.y),
            ("scale.z", scale.z),
        ];
        for (field, value) in checks {
            if !value.is_finite() {
                return Err(self.invalid(field, value));
            }
        }

        Ok(OrbitalParameters {
            local_offset,
            orbit_speed: self.orbit_speed,
            spin_speed: self.spin_speed,
            axial_tilt: self.axial_tilt_deg.to_radians(),
            scale,
        })
    }

    fn render_handle(&self, base_dir: Option<&Path>) -> RenderHandle {
        let texture = self.texture.as_ref().map(|path| match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        });
        RenderHandle {
            texture,
            tint: Vec3::from_array(self.tint),
        }
    }

    fn invalid(&self, field: &'static str, value: f32) -> SceneError {
        SceneError::InvalidParameter {
            body: self.name.clone(),
            field,
            value,
        }
    }
}

impl SceneConfig {
    /// Parse a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene file. Relative texture paths resolve against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&json)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the scene and register every body, parents first.
    pub fn build(&self) -> Result<Orrery, SceneError> {
        let lighting = self.lighting.to_lighting()?;
        let time_scale = self.simulation.time_scale;
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(SceneError::InvalidParameter {
                body: "simulation".into(),
                field: "time_scale",
                value: time_scale,
            });
        }
        let order = self.registration_order()?;

        let mut registry = BodyRegistry::new();
        for index in order {
            let body = &self.bodies[index];
            let orbit = body.orbital_parameters()?;
            let parent = match &body.parent {
                Some(name) => registry.find(name),
                None => None,
            };

            let kind = match (body.kind, parent) {
                (KindConfig::Star, None) => BodyKind::Star(Star {
                    orbit,
                    emission: Vec3::from_array(body.emission),
                }),
                (KindConfig::Star, Some(_)) => {
                    return Err(SceneError::UnexpectedParent {
                        body: body.name.clone(),
                    })
                }
                (KindConfig::Planet, parent) => BodyKind::Planet(Planet { orbit, parent }),
                (KindConfig::Moon, Some(parent)) => BodyKind::Moon(Moon { orbit, parent }),
                (KindConfig::Moon, None) => {
                    return Err(SceneError::MissingParent {
                        body: body.name.clone(),
                    })
                }
            };

            let render = body.render_handle(self.base_dir.as_deref());
            let handle = registry.register(body.name.clone(), kind, render)?;

            let registered = &registry[handle];
            let radius = registered.kind().orbit().orbit_radius();
            let light = match registered.kind() {
                BodyKind::Planet(Planet { parent: None, .. }) => {
                    format!(", {:.0}% light", 100.0 * lighting.attenuation.factor(radius))
                }
                _ => String::new(),
            };
            log::debug!(
                "Registered {} '{}' at radius {:.1}{}",
                registered.kind().label(),
                registered.name(),
                radius,
                light
            );
        }

        log::info!(
            "Built scene with {} bodies{}",
            registry.len(),
            registry
                .star()
                .map(|s| format!(", lit by '{}'", s.name()))
                .unwrap_or_default()
        );
        let mut orrery = Orrery::from_registry(registry, lighting);
        orrery.clock_mut().set_time_scale(time_scale);
        orrery.clock_mut().set_paused(self.simulation.paused);
        Ok(orrery)
    }

    /// Indices into `bodies` ordered so every parent precedes its children.
    ///
    /// Declaration order is kept wherever parents allow it.
    fn registration_order(&self) -> Result<Vec<usize>, SceneError> {
        let mut by_name = HashMap::with_capacity(self.bodies.len());
        for (index, body) in self.bodies.iter().enumerate() {
            if by_name.insert(body.name.as_str(), index).is_some() {
                return Err(SceneError::DuplicateName {
                    body: body.name.clone(),
                });
            }
        }

        let mut parents = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let parent = match &body.parent {
                Some(name) => Some(*by_name.get(name.as_str()).ok_or_else(|| SceneError::UnknownParent {
                    body: body.name.clone(),
                    parent: name.clone(),
                })?),
                None => None,
            };
            parents.push(parent);
        }

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Visiting,
            Done,
        }

        let mut marks = vec![Mark::New; self.bodies.len()];
        let mut order = Vec::with_capacity(self.bodies.len());
        for start in 0..self.bodies.len() {
            // Walk up to the first placed ancestor, then place the chain top-down.
            let mut chain = Vec::new();
            let mut cursor = Some(start);
            while let Some(index) = cursor {
                match marks[index] {
                    Mark::Done => break,
                    Mark::Visiting => {
                        return Err(SceneError::ParentCycle {
                            body: self.bodies[index].name.clone(),
                        })
                    }
                    Mark::New => {
                        marks[index] = Mark::Visiting;
                        chain.push(index);
                        cursor = parents[index];
                    }
                }
            }
            for &index in chain.iter().rev() {
                marks[index] = Mark::Done;
                order.push(index);
            }
        }
        Ok(order)
    }
}

impl Default for SceneConfig {
    /// The built-in solar system.
    fn default() -> Self {
        // The embedded scene is covered by tests.
        serde_json::from_str(DEFAULT_SCENE).unwrap_or_else(|e| panic!("embedded scene is invalid: {}", e))
    }
}
