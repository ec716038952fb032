//! The per-frame driver.
//!
//! [`Orrery`] owns the simulation clock, the body registry and the scene
//! lighting. Once per frame it advances time, recomputes every body in
//! registration order and hands the results to a [`FrameSink`], the seam
//! where a renderer plugs in.
//!
//! ```ignore
//! let mut orrery = SceneConfig::default().build()?;
//! let ctx = FrameContext { view_position: camera.position };
//! orrery.frame(timer.tick(), &ctx, &mut renderer);
//! ```

use glam::{Mat4, Vec3};

use crate::body::{BodyHandle, BodyKind, RenderHandle, Shading};
use crate::error::SceneError;
use crate::lighting::{FrameLighting, Lighting};
use crate::registry::BodyRegistry;
use crate::time::SimulationClock;

/// Per-frame state owned by the caller, typically the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// World position of the viewer, used for specular lighting.
    pub view_position: Vec3,
}

/// One body to draw this frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'a> {
    pub handle: BodyHandle,
    pub name: &'a str,
    /// The body's spin model matrix.
    pub model: Mat4,
    pub render: &'a RenderHandle,
    pub shading: Shading,
}

/// Receiver of a frame's output.
///
/// `begin_frame` is called once, then `draw` once per body in
/// registration order.
pub trait FrameSink {
    fn begin_frame(&mut self, _lighting: &FrameLighting) {}

    fn draw(&mut self, command: DrawCommand<'_>);
}

/// Collects draw commands as owned data. Handy for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub lighting: Option<FrameLighting>,
    pub draws: Vec<(BodyHandle, String, Mat4)>,
}

impl FrameSink for FrameRecorder {
    fn begin_frame(&mut self, lighting: &FrameLighting) {
        self.lighting = Some(*lighting);
        self.draws.clear();
    }

    fn draw(&mut self, command: DrawCommand<'_>) {
        self.draws
            .push((command.handle, command.name.to_string(), command.model));
    }
}

/// Clock, bodies and lighting of a running scene.
#[derive(Debug, Clone, Default)]
pub struct Orrery {
    clock: SimulationClock,
    registry: BodyRegistry,
    lighting: Lighting,
}

impl Orrery {
    /// An empty scene with default lighting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already populated registry.
    pub fn from_registry(registry: BodyRegistry, lighting: Lighting) -> Self {
        Self {
            clock: SimulationClock::new(),
            registry,
            lighting,
        }
    }

    /// Register a body. See [`BodyRegistry::register`].
    ///
    /// Mid-run registration is placed at the last computed frame's time,
    /// so it can be rendered straight away.
    pub fn register_body(
        &mut self,
        name: impl Into<String>,
        kind: BodyKind,
        render: RenderHandle,
    ) -> Result<BodyHandle, SceneError> {
        self.registry.register(name, kind, render)
    }

    /// Advance the clock and recompute every body. Returns simulation time.
    pub fn step_frame(&mut self, real_delta: f32) -> f64 {
        let t = self.clock.advance(real_delta);
        self.registry.update(t);
        t
    }

    /// Hand the current transforms to `sink`.
    pub fn render<S: FrameSink + ?Sized>(&self, ctx: &FrameContext, sink: &mut S) {
        sink.begin_frame(&self.frame_lighting(ctx));
        for (handle, body) in self.registry.iter() {
            sink.draw(DrawCommand {
                handle,
                name: body.name(),
                model: body.spin_model(),
                render: body.render_handle(),
                shading: body.kind().shading(),
            });
        }
    }

    /// [`step_frame`](Self::step_frame) followed by [`render`](Self::render).
    pub fn frame<S: FrameSink + ?Sized>(&mut self, real_delta: f32, ctx: &FrameContext, sink: &mut S) -> f64 {
        let t = self.step_frame(real_delta);
        self.render(ctx, sink);
        t
    }

    /// Lighting for the current state: the star's position and the viewer's.
    pub fn frame_lighting(&self, ctx: &FrameContext) -> FrameLighting {
        let light_position = self
            .registry
            .star()
            .map(|star| star.position())
            .unwrap_or(Vec3::ZERO);
        FrameLighting::new(&self.lighting, light_position, ctx.view_position)
    }

    #[inline]
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    #[inline]
    pub fn bodies(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Simulation time of the last computed frame.
    #[inline]
    pub fn time(&self) -> f64 {
        self.registry.time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Moon, OrbitalParameters, Planet, Star};
    use crate::compose::compose;
    use std::f32::consts::PI;

    fn scene() -> (Orrery, BodyHandle, BodyHandle, BodyHandle) {
        let mut orrery = Orrery::new();
        let sun = orrery
            .register_body(
                "sun",
                BodyKind::Star(Star {
                    orbit: OrbitalParameters::STATIONARY.with_uniform_scale(15.0),
                    emission: Vec3::new(1.0, 1.0, 0.0),
                }),
                RenderHandle::default(),
            )
            .unwrap();
        let earth = orrery
            .register_body(
                "earth",
                BodyKind::Planet(Planet {
                    orbit: OrbitalParameters::circular(60.0, 0.5)
                        .with_spin(0.7)
                        .with_tilt(23.5_f32.to_radians()),
                    parent: None,
                }),
                RenderHandle::default(),
            )
            .unwrap();
        let moon = orrery
            .register_body(
                "moon",
                BodyKind::Moon(Moon {
                    orbit: OrbitalParameters::circular(3.0, 5.0).with_uniform_scale(0.1),
                    parent: earth,
                }),
                RenderHandle::default(),
            )
            .unwrap();
        (orrery, sun, earth, moon)
    }

    #[test]
    fn test_draws_in_registration_order() {
        let (mut orrery, sun, earth, moon) = scene();
        let mut recorder = FrameRecorder::default();
        orrery.frame(0.016, &FrameContext::default(), &mut recorder);

        let handles: Vec<_> = recorder.draws.iter().map(|(h, _, _)| *h).collect();
        assert_eq!(handles, vec![sun, earth, moon]);
        assert_eq!(recorder.draws[2].1, "moon");
    }

    #[test]
    fn test_draw_uses_spin_model() {
        let (mut orrery, _, earth, _) = scene();
        let mut recorder = FrameRecorder::default();
        orrery.frame(1.0, &FrameContext::default(), &mut recorder);

        let drawn = recorder.draws[earth.index()].2;
        assert_eq!(drawn, orrery.bodies()[earth].spin_model());
    }

    #[test]
    fn test_lighting_tracks_star_and_viewer() {
        let (mut orrery, _, _, _) = scene();
        let mut recorder = FrameRecorder::default();
        let ctx = FrameContext {
            view_position: Vec3::new(20.0, 0.0, -100.0),
        };
        orrery.frame(0.5, &ctx, &mut recorder);

        let lighting = recorder.lighting.unwrap();
        assert!(lighting.light_position.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert_eq!(lighting.view_position, ctx.view_position);
    }

    #[test]
    fn test_paused_frames_do_not_move_bodies() {
        let (mut orrery, _, earth, _) = scene();
        orrery.step_frame(1.0);
        let before = orrery.bodies()[earth].spin_model();

        orrery.clock_mut().pause();
        assert_eq!(orrery.step_frame(0.7), 1.0);
        assert_eq!(orrery.bodies()[earth].spin_model(), before);
    }

    #[test]
    fn test_moon_stays_at_distance_from_planet() {
        let (mut orrery, _, earth, moon) = scene();
        for _ in 0..50 {
            orrery.step_frame(0.1);
            let d = orrery.bodies()[moon]
                .position()
                .distance(orrery.bodies()[earth].position());
            assert!((d - 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_body_added_mid_run_renders_at_current_time() {
        let mut orrery = Orrery::new();
        let planet = orrery
            .register_body(
                "planet",
                BodyKind::Planet(Planet {
                    orbit: OrbitalParameters::circular(10.0, 1.0),
                    parent: None,
                }),
                RenderHandle::default(),
            )
            .unwrap();
        let t = orrery.step_frame(PI);

        let orbit = OrbitalParameters::circular(2.0, 1.0);
        let moon = orrery
            .register_body("moon", BodyKind::Moon(Moon { orbit, parent: planet }), RenderHandle::default())
            .unwrap();

        let mut recorder = FrameRecorder::default();
        orrery.render(&FrameContext::default(), &mut recorder);

        let parent = orrery.bodies()[planet].non_spin_model();
        let expected = compose(&orbit, t, Some(&parent));
        let drawn = recorder.draws[moon.index()].2;
        assert!(drawn.abs_diff_eq(expected.spin, 1e-5));
        assert!(orrery.bodies()[moon].position().abs_diff_eq(Vec3::new(-8.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn test_no_star_lights_from_origin() {
        let mut orrery = Orrery::new();
        orrery
            .register_body(
                "rock",
                BodyKind::Planet(Planet {
                    orbit: OrbitalParameters::circular(1.0, PI),
                    parent: None,
                }),
                RenderHandle::default(),
            )
            .unwrap();
        let lighting = orrery.frame_lighting(&FrameContext::default());
        assert_eq!(lighting.light_position, Vec3::ZERO);
    }
}
