use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::camera_utils::CameraInput;

/// Turns raw window input into [`CameraInput`] steps
pub struct CameraController {
    pub zoom_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(zoom_speed: f32) -> Self {
        Self {
            zoom_speed,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    /// Translates a device event; `None` when it carries no camera input
    pub fn translate(&mut self, event: &DeviceEvent) -> Option<CameraInput> {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                None
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                Some(CameraInput::Zoom(scroll_amount * self.zoom_speed))
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                if self.is_shift_held {
                    Some(CameraInput::Pan { dx, dy })
                } else {
                    Some(CameraInput::Rotate { dx, dy })
                }
            }
            _ => None,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            let was_shift_held = self.is_shift_held;
            self.is_shift_held = *state == ElementState::Pressed;
            if was_shift_held != self.is_shift_held {
                log::trace!("shift held: {}", self.is_shift_held);
            }
        }
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_needs_button() {
        let mut controller = CameraController::default();
        let motion = DeviceEvent::MouseMotion { delta: (4.0, 2.0) };
        assert_eq!(controller.translate(&motion), None);

        controller.translate(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        });
        assert!(controller.is_rotating());
        assert_eq!(
            controller.translate(&motion),
            Some(CameraInput::Rotate { dx: 4.0, dy: 2.0 })
        );
    }

    #[test]
    fn test_wheel_zooms() {
        let mut controller = CameraController::new(2.0);
        let wheel = DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        };
        assert_eq!(controller.translate(&wheel), Some(CameraInput::Zoom(-2.0)));
    }
}
