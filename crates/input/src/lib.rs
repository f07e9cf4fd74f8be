//! Input handling: winit keyboard/mouse translation into discrete gameplay events.

mod intent;

pub use intent::*;

use std::collections::HashSet;

/// Radians of camera rotation per pixel of raw mouse motion at sensitivity 1.0.
pub const LOOK_RADIANS_PER_PIXEL: f32 = 0.002;

/// Translates raw window events into [`InputEvent`]s.
///
/// Key repeat is filtered here: a held key produces one press until released.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Events produced since the last drain.
    pending: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.insert(key) {
                    return;
                }
                if let Some(event) = key_pressed_event(key) {
                    log::trace!("{:?} -> {:?}", key, event);
                    self.pending.push(event);
                }
            }
            ElementState::Released => {
                if !self.keys_held.remove(&key) {
                    return;
                }
                if let Some(direction) = movement_key(key) {
                    self.pending.push(InputEvent::Move {
                        direction,
                        pressed: false,
                    });
                }
            }
        }
    }

    /// Process a mouse button event. Only the left button drives the trigger.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) && button == MouseButton::Left {
                    self.pending.push(InputEvent::FireDown);
                }
            }
            ElementState::Released => {
                if self.mouse_held.remove(&button) && button == MouseButton::Left {
                    self.pending.push(InputEvent::FireUp);
                }
            }
        }
    }

    /// Process raw mouse motion (pixels). Moving right turns right; moving down looks down.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64), sensitivity: f32) {
        let scale = LOOK_RADIANS_PER_PIXEL * sensitivity;
        self.pending.push(InputEvent::Look {
            yaw: -(delta.0 as f32) * scale,
            pitch: -(delta.1 as f32) * scale,
        });
    }

    /// Take all events produced since the last call, in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }
}

fn movement_key(key: KeyCode) -> Option<MoveDirection> {
    match key {
        KeyCode::KeyW => Some(MoveDirection::Forward),
        KeyCode::KeyS => Some(MoveDirection::Backward),
        KeyCode::KeyA => Some(MoveDirection::Left),
        KeyCode::KeyD => Some(MoveDirection::Right),
        _ => None,
    }
}

fn key_pressed_event(key: KeyCode) -> Option<InputEvent> {
    if let Some(direction) = movement_key(key) {
        return Some(InputEvent::Move {
            direction,
            pressed: true,
        });
    }
    match key {
        KeyCode::Space => Some(InputEvent::Jump),
        KeyCode::KeyR => Some(InputEvent::Reload),
        KeyCode::Digit1 => Some(InputEvent::SelectWeapon(0)),
        KeyCode::Digit2 => Some(InputEvent::SelectWeapon(1)),
        _ => None,
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_repeat_yields_single_press() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert_eq!(
            input.drain(),
            vec![
                InputEvent::Move {
                    direction: MoveDirection::Forward,
                    pressed: true,
                },
                InputEvent::Move {
                    direction: MoveDirection::Forward,
                    pressed: false,
                },
            ]
        );
        assert!(input.drain().is_empty());
    }

    #[test]
    fn action_keys_map_to_events() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        input.process_keyboard(KeyCode::Digit2, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        input.process_keyboard(KeyCode::Space, ElementState::Released);
        assert_eq!(
            input.drain(),
            vec![InputEvent::Jump, InputEvent::Reload, InputEvent::SelectWeapon(1)]
        );
    }

    #[test]
    fn left_button_drives_fire() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(input.drain(), vec![InputEvent::FireDown, InputEvent::FireUp]);
    }

    #[test]
    fn mouse_motion_scales_by_sensitivity() {
        let mut input = InputState::new();
        input.process_mouse_motion((100.0, -50.0), 2.0);
        match input.drain().as_slice() {
            [InputEvent::Look { yaw, pitch }] => {
                assert!((yaw + 0.4).abs() < 1e-6);
                assert!((pitch - 0.2).abs() < 1e-6);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }
}
