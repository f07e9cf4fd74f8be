//! Discrete input events and the intent state they write to.
//!
//! Events land between ticks and are folded into [`IntentState`]; the
//! simulation reads one [`FrameIntent`] per tick via [`IntentState::take_frame`].
//! Level state (movement keys, fire held) persists across frames. Edges
//! (jump, reload, weapon select, fire press/release) are latched until taken,
//! so a press and release inside one tick still reach the simulation.

use glam::Vec2;

/// One of the four horizontal movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// A discrete event from the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Move {
        direction: MoveDirection,
        pressed: bool,
    },
    Jump,
    FireDown,
    FireUp,
    /// Weapon slot, zero based.
    SelectWeapon(u8),
    Reload,
    /// Camera rotation in radians.
    Look { yaw: f32, pitch: f32 },
}

/// Movement key flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    /// Movement as a normalized vector: `x` = right, `y` = forward.
    /// Opposing keys cancel out.
    pub fn axis(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;
        if self.forward {
            movement.y += 1.0;
        }
        if self.backward {
            movement.y -= 1.0;
        }
        if self.left {
            movement.x -= 1.0;
        }
        if self.right {
            movement.x += 1.0;
        }
        movement.normalize_or_zero()
    }

    fn set(&mut self, direction: MoveDirection, pressed: bool) {
        match direction {
            MoveDirection::Forward => self.forward = pressed,
            MoveDirection::Backward => self.backward = pressed,
            MoveDirection::Left => self.left = pressed,
            MoveDirection::Right => self.right = pressed,
        }
    }
}

/// Intent consumed by a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameIntent {
    pub movement: MovementIntent,
    pub jump: bool,
    pub fire_held: bool,
    /// A fresh fire press happened since the last tick.
    pub fire_pressed: bool,
    /// A fire release happened since the last tick.
    pub fire_released: bool,
    pub reload: bool,
    /// Last weapon slot selected since the last tick.
    pub weapon_select: Option<u8>,
    /// Accumulated look rotation (x = yaw, y = pitch) in radians.
    pub look: Vec2,
}

/// Shared intent flags written by input events.
#[derive(Debug, Default)]
pub struct IntentState {
    movement: MovementIntent,
    fire_held: bool,
    fire_pressed: bool,
    fire_released: bool,
    jump: bool,
    reload: bool,
    weapon_select: Option<u8>,
    look: Vec2,
}

impl IntentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the intent state. Never blocks, never queues.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move { direction, pressed } => self.movement.set(direction, pressed),
            InputEvent::Jump => self.jump = true,
            InputEvent::FireDown => {
                // A second press without a release in between is not a new press.
                if !self.fire_held {
                    self.fire_pressed = true;
                }
                self.fire_held = true;
            }
            InputEvent::FireUp => {
                if self.fire_held {
                    self.fire_released = true;
                }
                self.fire_held = false;
            }
            InputEvent::SelectWeapon(slot) => self.weapon_select = Some(slot),
            InputEvent::Reload => self.reload = true,
            InputEvent::Look { yaw, pitch } => {
                if yaw.is_finite() && pitch.is_finite() {
                    self.look += Vec2::new(yaw, pitch);
                }
            }
        }
    }

    /// Take this tick's intent, clearing latched edges.
    pub fn take_frame(&mut self) -> FrameIntent {
        let frame = FrameIntent {
            movement: self.movement,
            jump: self.jump,
            fire_held: self.fire_held,
            fire_pressed: self.fire_pressed,
            fire_released: self.fire_released,
            reload: self.reload,
            weapon_select: self.weapon_select,
            look: self.look,
        };
        self.jump = false;
        self.fire_pressed = false;
        self.fire_released = false;
        self.reload = false;
        self.weapon_select = None;
        self.look = Vec2::ZERO;
        frame
    }
}
