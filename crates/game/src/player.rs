//! Player controller: walking, jumping, gravity, and wall collision.

use std::time::Duration;

use engine_core::{Transform, Vec3};
use input::FrameIntent;
use physics::Aabb;

use crate::config::PlayerConfig;

/// Player controller handling movement and camera orientation.
pub struct PlayerController {
    /// Eye position and look orientation.
    pub transform: Transform,
    vertical_velocity: f32,
    is_grounded: bool,
    move_speed: f32,
    gravity: f32,
    jump_force: f32,
    ground_height: f32,
    box_size: Vec3,
    max_step: f32,
}

impl PlayerController {
    pub fn new(config: &PlayerConfig) -> Self {
        let spawn = Vec3::from_array(config.spawn);
        Self {
            transform: Transform::from_position(spawn),
            vertical_velocity: 0.0,
            is_grounded: spawn.y <= config.ground_height,
            move_speed: config.move_speed,
            gravity: config.gravity,
            jump_force: config.jump_impulse,
            ground_height: config.ground_height,
            box_size: Vec3::from_array(config.box_size),
            max_step: Duration::from_millis(config.max_step_ms).as_secs_f32(),
        }
    }

    /// Rotate the camera by yaw/pitch deltas in radians.
    pub fn look(&mut self, yaw: f32, pitch: f32) {
        self.transform.rotate_y(yaw);
        self.transform.rotate_x(pitch);
    }

    /// Integrate one tick of movement. Returns true if the wall blocked the horizontal move.
    ///
    /// `dt` is clamped to the configured max step so a long stall cannot
    /// carry the player through the wall in one jump.
    pub fn update(&mut self, intent: &FrameIntent, dt: f32, wall: &Aabb) -> bool {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.max_step) } else { 0.0 };

        // Jump only from the ground
        if intent.jump && self.is_grounded {
            self.vertical_velocity = self.jump_force;
            self.is_grounded = false;
        }

        // Horizontal move on the flattened camera basis, so pitch never changes speed
        let movement = intent.movement.axis();
        let mut front = self.transform.forward();
        front.y = 0.0;
        let front = front.normalize_or_zero();
        let right = front.cross(Vec3::Y).normalize_or_zero();
        let step = self.move_speed * dt;
        let horizontal = front * (movement.y * step) + right * (movement.x * step);

        // Gravity and landing
        self.vertical_velocity -= self.gravity * dt;
        let mut next_y = self.transform.position.y + self.vertical_velocity * dt;
        if next_y < self.ground_height {
            next_y = self.ground_height;
            self.vertical_velocity = 0.0;
            self.is_grounded = true;
        }

        let current = self.transform.position;
        let candidate = Vec3::new(current.x + horizontal.x, next_y, current.z + horizontal.z);
        let player_box = Aabb::from_center_size(candidate, self.box_size);
        if wall.intersects(&player_box) {
            // Keep the old footing but still fall/jump
            self.transform.position.y = next_y;
            true
        } else {
            self.transform.position = candidate;
            false
        }
    }

    /// Get the eye position.
    pub fn eye(&self) -> Vec3 {
        self.transform.position
    }

    /// Normalised camera forward vector.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::MovementIntent;

    const DT: f32 = 1.0 / 60.0;

    fn wall() -> Aabb {
        Aabb::from_center_size(Vec3::new(0.0, 0.0, -10.0), Vec3::new(20.0, 4.0, 1.0))
    }

    fn grounded_player_at(x: f32, z: f32) -> PlayerController {
        let config = PlayerConfig {
            spawn: [x, 1.0, z],
            ..Default::default()
        };
        PlayerController::new(&config)
    }

    fn walking(forward: bool, right: bool) -> FrameIntent {
        FrameIntent {
            movement: MovementIntent {
                forward,
                right,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn spawn_above_ground_falls_and_lands() {
        let mut player = PlayerController::new(&PlayerConfig::default());
        assert!(!player.is_grounded());
        for _ in 0..120 {
            player.update(&FrameIntent::default(), DT, &wall());
        }
        assert!(player.is_grounded());
        assert_eq!(player.eye().y, 1.0);
        assert_eq!(player.vertical_velocity(), 0.0);
    }

    #[test]
    fn forward_walks_toward_negative_z() {
        let mut player = grounded_player_at(0.0, 5.0);
        player.update(&walking(true, false), 0.1, &wall());
        assert!((player.eye().z - 4.5).abs() < 1e-5);
        assert!(player.eye().x.abs() < 1e-5);
    }

    #[test]
    fn pitch_does_not_change_ground_speed() {
        let mut level = grounded_player_at(0.0, 5.0);
        let mut pitched = grounded_player_at(0.0, 5.0);
        pitched.look(0.0, 1.2);
        level.update(&walking(true, true), 0.05, &wall());
        pitched.update(&walking(true, true), 0.05, &wall());
        assert!((level.eye() - pitched.eye()).length() < 1e-5);
        let travelled = (level.eye() - Vec3::new(0.0, 1.0, 5.0)).length();
        assert!((travelled - 0.25).abs() < 1e-5);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut player = grounded_player_at(0.0, 5.0);
        player.update(&walking(true, false), 2.0, &wall());
        assert!((player.eye().z - 4.5).abs() < 1e-5);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut player = grounded_player_at(0.0, 5.0);
        let jump = FrameIntent {
            jump: true,
            ..Default::default()
        };
        player.update(&jump, DT, &wall());
        assert!(!player.is_grounded());
        let airborne_velocity = player.vertical_velocity();
        assert!(airborne_velocity > 7.0);
        // A second press mid-air is ignored
        player.update(&jump, DT, &wall());
        assert!(player.vertical_velocity() < airborne_velocity);
        assert!(player.eye().y > 1.0);
    }

    #[test]
    fn wall_blocks_horizontal_but_not_vertical_motion() {
        let mut player = grounded_player_at(0.0, -8.95);
        let jump_forward = FrameIntent {
            jump: true,
            ..walking(true, false)
        };
        let blocked = player.update(&jump_forward, 0.05, &wall());
        assert!(blocked);
        assert_eq!(player.eye().x, 0.0);
        assert_eq!(player.eye().z, -8.95);
        assert!(player.eye().y > 1.0);
    }

    #[test]
    fn clear_path_is_not_blocked() {
        let mut player = grounded_player_at(0.0, 0.0);
        assert!(!player.update(&walking(true, false), 0.05, &wall()));
        assert!(player.eye().z < 0.0);
    }
}
