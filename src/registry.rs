//! Ordered storage for the bodies of a scene.
//!
//! Bodies live in a flat arena and are addressed by [`BodyHandle`]. A body
//! can only name a parent that is already registered, so iterating in
//! registration order always visits a parent before its dependents and a
//! single pass per frame is enough to resolve every parent matrix.
//!
//! The registry remembers the simulation time of its last update. A body
//! registered later is placed at that same time, so every body in the
//! arena always describes one instant.

use crate::body::{Body, BodyHandle, BodyKind, RenderHandle};
use crate::error::SceneError;

/// Arena of bodies in registration order.
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    /// Simulation time the stored transforms were computed for.
    time: f64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle.
    ///
    /// Fails if the body's parent is not registered yet. The new body's
    /// transforms are computed at the registry's current time, against its
    /// parent's matrix for that same time.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: BodyKind,
        render: RenderHandle,
    ) -> Result<BodyHandle, SceneError> {
        let name = name.into();
        let parent = match kind.parent() {
            Some(parent) if parent.index() >= self.bodies.len() => {
                return Err(SceneError::UnregisteredParent { body: name });
            }
            Some(parent) => Some(self.bodies[parent.index()].non_spin_model()),
            None => None,
        };

        let handle = BodyHandle(self.bodies.len());
        let mut body = Body::new(name, kind, render);
        body.compute_transforms(self.time, parent.as_ref());
        self.bodies.push(body);
        Ok(handle)
    }

    /// Recompute every body for simulation time `t`, parents first.
    pub fn update(&mut self, t: f64) {
        self.time = t;
        for index in 0..self.bodies.len() {
            let parent = self.bodies[index]
                .kind()
                .parent()
                .map(|p| self.bodies[p.index()].non_spin_model());
            self.bodies[index].compute_transforms(t, parent.as_ref());
        }
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.index())
    }

    /// Simulation time of the last [`update`](Self::update), `0.0` before any.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Look up a body by name.
    pub fn find(&self, name: &str) -> Option<BodyHandle> {
        self.bodies
            .iter()
            .position(|b| b.name() == name)
            .map(BodyHandle)
    }

    /// Bodies with their handles, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyHandle(i), b))
    }

    /// The first registered star, if any.
    pub fn star(&self) -> Option<&Body> {
        self.bodies
            .iter()
            .find(|b| matches!(b.kind(), BodyKind::Star(_)))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl std::ops::Index<BodyHandle> for BodyRegistry {
    type Output = Body;

    fn index(&self, handle: BodyHandle) -> &Body {
        &self.bodies[handle.index()]
    }
}
