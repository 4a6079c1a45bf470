use winit::event::{ElementState, MouseButton};

use crate::camera::Camera;

/// Just short of +/-89 degrees, keeps the orbit away from the poles.
const MAX_PITCH: f32 = 1.553_343;
const DRAG_SENSITIVITY: f32 = 0.005;

/// Left-drag orbit around the camera target. Spherical state is re-derived
/// from the camera on every update, so programmatic camera moves are picked
/// up automatically; [`sync`](OrbitControls::sync) must still be called after
/// such a move to discard drag deltas accumulated against the old position.
pub struct OrbitControls {
    dragging: bool,
    pending: glam::Vec2,
}

impl OrbitControls {
    pub fn new() -> Self {
        OrbitControls {
            dragging: false,
            pending: glam::Vec2::ZERO,
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state.is_pressed();
        }
    }

    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.dragging {
            self.pending += glam::Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Applies the pending drag to the camera, preserving the orbit radius.
    /// A no-op when nothing is pending.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.pending == glam::Vec2::ZERO {
            return;
        }
        let offset = camera.eye - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            self.pending = glam::Vec2::ZERO;
            return;
        }

        let mut yaw = offset.x.atan2(offset.z);
        let mut pitch = (offset.y / radius).asin();
        yaw -= self.pending.x * DRAG_SENSITIVITY;
        pitch = (pitch - self.pending.y * DRAG_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
        self.pending = glam::Vec2::ZERO;

        camera.eye = camera.target
            + radius
                * glam::Vec3::new(
                    pitch.cos() * yaw.sin(),
                    pitch.sin(),
                    pitch.cos() * yaw.cos(),
                );
    }

    /// Drops in-flight drag deltas. Call after any programmatic camera move
    /// so the next update does not fight it.
    pub fn sync(&mut self) {
        self.pending = glam::Vec2::ZERO;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn camera_at_rest() -> Camera {
        Camera::new(glam::Vec3::new(0.0, 0.0, 30.0), 16.0 / 9.0)
    }

    #[test]
    fn update_without_pending_drag_leaves_the_camera_alone() {
        let mut controls = OrbitControls::new();
        let mut camera = camera_at_rest();
        controls.update(&mut camera);
        assert_eq!(camera.eye, glam::Vec3::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn motion_without_a_held_button_is_ignored() {
        let mut controls = OrbitControls::new();
        let mut camera = camera_at_rest();
        controls.on_mouse_motion(100.0, 50.0);
        controls.update(&mut camera);
        assert_eq!(camera.eye, glam::Vec3::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn dragging_orbits_without_changing_the_radius() {
        let mut controls = OrbitControls::new();
        let mut camera = camera_at_rest();
        controls.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        controls.on_mouse_motion(80.0, -25.0);
        controls.update(&mut camera);
        assert_ne!(camera.eye, glam::Vec3::new(0.0, 0.0, 30.0));
        assert_relative_eq!(camera.eye.length(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn pitch_clamps_short_of_the_poles() {
        let mut controls = OrbitControls::new();
        let mut camera = camera_at_rest();
        controls.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        controls.on_mouse_motion(0.0, -100_000.0);
        controls.update(&mut camera);
        let pitch = (camera.eye.y / camera.eye.length()).asin();
        assert!(pitch <= MAX_PITCH + 1e-5);
        assert!(camera.eye.y < camera.eye.length());
    }

    #[test]
    fn sync_discards_pending_drag_deltas() {
        let mut controls = OrbitControls::new();
        let mut camera = camera_at_rest();
        controls.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        controls.on_mouse_motion(500.0, 500.0);
        controls.sync();
        controls.update(&mut camera);
        assert_eq!(camera.eye, glam::Vec3::new(0.0, 0.0, 30.0));
    }
}
