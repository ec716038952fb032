//! Celestial bodies and their immutable orbital parameters.
//!
//! A body is one of three kinds: a [`Star`], a [`Planet`] or a [`Moon`].
//! Each kind carries its own payload, and the kind decides which parent
//! a body may have:
//!
//! | Kind   | Parent          | Shading  |
//! |--------|-----------------|----------|
//! | Star   | never           | emissive |
//! | Planet | optional        | lit      |
//! | Moon   | always required | lit      |
//!
//! Parents are referenced by [`BodyHandle`], an index into the
//! [`BodyRegistry`](crate::BodyRegistry), never by pointer.

use glam::{Mat4, Vec3};

use crate::compose::{compose, Transforms};

/// Stable identity of a registered body.
///
/// Handles are handed out by [`BodyRegistry::register`](crate::BodyRegistry::register)
/// in registration order and stay valid for the lifetime of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// Position of the body in registration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-body orbital configuration.
///
/// All angles are radians, all speeds radians per second of simulation
/// time. Nothing in here changes after construction: every per-frame
/// variation comes from the simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParameters {
    /// Position relative to the orbit pivot before the orbit rotation.
    pub local_offset: Vec3,
    /// Revolution speed about the pivot. Zero means stationary.
    pub orbit_speed: f32,
    /// Rotation speed about the body's own up axis.
    pub spin_speed: f32,
    /// Fixed rotation about the orbit normal, applied before spin.
    pub axial_tilt: f32,
    /// Visual scale, applied last.
    pub scale: Vec3,
}

impl OrbitalParameters {
    /// A body sitting on its pivot with unit scale and no motion.
    pub const STATIONARY: Self = Self {
        local_offset: Vec3::ZERO,
        orbit_speed: 0.0,
        spin_speed: 0.0,
        axial_tilt: 0.0,
        scale: Vec3::ONE,
    };

    /// A body orbiting at `radius` along +X with the given revolution speed.
    pub fn circular(radius: f32, orbit_speed: f32) -> Self {
        Self {
            local_offset: Vec3::new(radius, 0.0, 0.0),
            orbit_speed,
            ..Self::STATIONARY
        }
    }

    /// Set the spin speed.
    pub fn with_spin(mut self, spin_speed: f32) -> Self {
        self.spin_speed = spin_speed;
        self
    }

    /// Set the axial tilt in radians.
    pub fn with_tilt(mut self, axial_tilt: f32) -> Self {
        self.axial_tilt = axial_tilt;
        self
    }

    /// Set a uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Set a per-axis scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Distance from the pivot, i.e. the orbit radius.
    #[inline]
    pub fn orbit_radius(&self) -> f32 {
        self.local_offset.length()
    }

    /// Whether the body revolves around its pivot.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.orbit_speed == 0.0
    }
}

impl Default for OrbitalParameters {
    fn default() -> Self {
        Self::STATIONARY
    }
}

/// The light source of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub orbit: OrbitalParameters,
    /// Emitted colour, multiplied into the star's texture.
    pub emission: Vec3,
}

/// A body orbiting the world origin or, optionally, another body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    pub orbit: OrbitalParameters,
    pub parent: Option<BodyHandle>,
}

/// A body that always orbits another body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moon {
    pub orbit: OrbitalParameters,
    pub parent: BodyHandle,
}

/// What a body is, with the parameters that kind needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Star(Star),
    Planet(Planet),
    Moon(Moon),
}

impl BodyKind {
    /// The orbital parameters of this body.
    pub fn orbit(&self) -> &OrbitalParameters {
        match self {
            BodyKind::Star(star) => &star.orbit,
            BodyKind::Planet(planet) => &planet.orbit,
            BodyKind::Moon(moon) => &moon.orbit,
        }
    }

    /// The body whose non-spin transform this body is placed under.
    pub fn parent(&self) -> Option<BodyHandle> {
        match self {
            BodyKind::Star(_) => None,
            BodyKind::Planet(planet) => planet.parent,
            BodyKind::Moon(moon) => Some(moon.parent),
        }
    }

    /// How the renderer should shade this body.
    pub fn shading(&self) -> Shading {
        match self {
            BodyKind::Star(star) => Shading::Emissive(star.emission),
            BodyKind::Planet(_) | BodyKind::Moon(_) => Shading::Lit,
        }
    }

    /// Short lowercase name of the kind, used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Star(_) => "star",
            BodyKind::Planet(_) => "planet",
            BodyKind::Moon(_) => "moon",
        }
    }
}

/// Shading model requested for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Self-lit with the given colour. Ignores scene lighting.
    Emissive(Vec3),
    /// Phong-lit by the scene's star.
    Lit,
}

/// Appearance of a body, opaque to the transform core.
///
/// The renderer decides what to do with it; the core only passes it along
/// with each draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderHandle {
    /// Image file used as the surface texture.
    pub texture: Option<std::path::PathBuf>,
    /// Base colour, used on its own when there is no texture.
    pub tint: Vec3,
}

impl Default for RenderHandle {
    fn default() -> Self {
        Self {
            texture: None,
            tint: Vec3::ONE,
        }
    }
}

/// A registered body and the transforms computed for the current frame.
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    kind: BodyKind,
    render: RenderHandle,
    transforms: Transforms,
}

impl Body {
    pub(crate) fn new(name: String, kind: BodyKind, render: RenderHandle) -> Self {
        Self {
            name,
            kind,
            render,
            transforms: Transforms::IDENTITY,
        }
    }

    /// Recompute both matrices for simulation time `t`.
    ///
    /// `parent_non_spin` is the non-spin matrix of this body's parent,
    /// already computed for the same frame. A star has no pivot other
    /// than the world origin and ignores it.
    pub fn compute_transforms(&mut self, t: f64, parent_non_spin: Option<&Mat4>) {
        self.transforms = match &self.kind {
            BodyKind::Star(star) => compose(&star.orbit, t, None),
            BodyKind::Planet(planet) => compose(&planet.orbit, t, parent_non_spin),
            BodyKind::Moon(moon) => compose(&moon.orbit, t, parent_non_spin),
        };
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    #[inline]
    pub fn render_handle(&self) -> &RenderHandle {
        &self.render
    }

    /// Both matrices from the last computation.
    #[inline]
    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    /// Placement without spin and scale. This is what children read.
    #[inline]
    pub fn non_spin_model(&self) -> Mat4 {
        self.transforms.non_spin
    }

    /// The matrix submitted for rendering.
    #[inline]
    pub fn spin_model(&self) -> Mat4 {
        self.transforms.spin
    }

    /// World-space centre of the body.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transforms.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_circular_params() {
        let orbit = OrbitalParameters::circular(60.0, 0.5)
            .with_spin(0.7)
            .with_tilt(23.5_f32.to_radians())
            .with_uniform_scale(2.0);

        assert_eq!(orbit.local_offset, Vec3::new(60.0, 0.0, 0.0));
        assert_eq!(orbit.orbit_radius(), 60.0);
        assert_eq!(orbit.scale, Vec3::splat(2.0));
        assert!(!orbit.is_stationary());
        assert!(OrbitalParameters::default().is_stationary());
    }

    #[test]
    fn test_kind_parent_and_shading() {
        let star = BodyKind::Star(Star {
            orbit: OrbitalParameters::STATIONARY,
            emission: Vec3::new(1.0, 1.0, 0.0),
        });
        let planet = BodyKind::Planet(Planet {
            orbit: OrbitalParameters::circular(10.0, 1.0),
            parent: None,
        });
        let moon = BodyKind::Moon(Moon {
            orbit: OrbitalParameters::circular(2.0, 5.0),
            parent: BodyHandle(1),
        });

        assert_eq!(star.parent(), None);
        assert_eq!(planet.parent(), None);
        assert_eq!(moon.parent(), Some(BodyHandle(1)));

        assert_eq!(star.shading(), Shading::Emissive(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(planet.shading(), Shading::Lit);
        assert_eq!(moon.label(), "moon");
    }

    #[test]
    fn test_star_ignores_parent_matrix() {
        let mut star = Body::new(
            "sun".into(),
            BodyKind::Star(Star {
                orbit: OrbitalParameters::STATIONARY,
                emission: Vec3::ONE,
            }),
            RenderHandle::default(),
        );
        let elsewhere = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        star.compute_transforms(3.0, Some(&elsewhere));
        assert!(star.position().abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn test_planet_follows_parent_matrix() {
        let mut planet = Body::new(
            "satellite".into(),
            BodyKind::Planet(Planet {
                orbit: OrbitalParameters::circular(1.0, PI),
                parent: Some(BodyHandle(0)),
            }),
            RenderHandle::default(),
        );
        let pivot = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        planet.compute_transforms(1.0, Some(&pivot));
        assert!(planet.position().abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
    }
}
