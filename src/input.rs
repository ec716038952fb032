//! Input state for the viewer.
//!
//! `Input` folds raw winit events into per-frame state: keys pressed this
//! frame, keys held, accumulated mouse motion and scroll. Call
//! [`Input::end_frame`] after the frame has consumed it.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Lines per pixel for touchpad scrolling.
const PIXELS_PER_LINE: f32 = 0.1;

/// Keyboard and mouse state for one frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_delta: Vec2,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key was pressed this frame (just went down).
    ///
    /// Key repeat does not count as a new press.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Mouse motion accumulated this frame, in pixels. Positive y is down.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll accumulated this frame, in lines. Positive is away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Record a window event. Returns `true` if it was an input event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.set_key(code, event.state, event.repeat);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * PIXELS_PER_LINE,
                };
                true
            }
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                false
            }
            _ => false,
        }
    }

    /// Record raw mouse motion from a device event.
    pub fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Clear per-frame state. Held keys persist.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    fn set_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if !repeat && self.keys_held.insert(code) {
                    self.keys_pressed.insert(code);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_edge_triggered() {
        let mut input = Input::new();
        input.set_key(KeyCode::Space, ElementState::Pressed, false);
        assert!(input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        input.end_frame();
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        // Held key reported again by the OS
        input.set_key(KeyCode::Space, ElementState::Pressed, true);
        assert!(!input.key_pressed(KeyCode::Space));

        input.set_key(KeyCode::Space, ElementState::Released, false);
        assert!(!input.key_held(KeyCode::Space));
    }

    #[test]
    fn test_mouse_motion_accumulates() {
        let mut input = Input::new();
        input.handle_mouse_motion(3.0, -1.0);
        input.handle_mouse_motion(2.0, 4.0);
        assert_eq!(input.mouse_delta(), Vec2::new(5.0, 3.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut input = Input::new();
        let event = WindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
            phase: winit::event::TouchPhase::Moved,
        };
        assert!(input.handle_window_event(&event));
        assert!(input.handle_window_event(&event));
        assert_eq!(input.scroll_delta(), 4.0);
    }
}
