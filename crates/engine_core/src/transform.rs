//! Camera transform with yaw/pitch orientation.

use glam::{Quat, Vec3};

/// Pitch limit, just short of straight up/down so the flattened forward never degenerates.
pub const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// A position plus a yaw/pitch orientation (right-handed, -Z forward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    yaw: f32,
    pitch: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position, looking down -Z.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with an explicit yaw (around +Y) and pitch (around local +X).
    pub fn from_yaw_pitch(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut transform = Self::from_position(position);
        transform.set_yaw_pitch(yaw, pitch);
        transform
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate around the world Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) {
        self.set_yaw_pitch(self.yaw + angle, self.pitch);
    }

    /// Rotate around the local X axis (pitch), clamped to [`MAX_PITCH`].
    pub fn rotate_x(&mut self, angle: f32) {
        self.set_yaw_pitch(self.yaw, self.pitch + angle);
    }

    /// Set yaw and pitch directly. Non-finite angles are ignored.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        if !yaw.is_finite() || !pitch.is_finite() {
            return;
        }
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_looks_down_negative_z() {
        let t = Transform::default();
        assert!(approx(t.forward(), Vec3::NEG_Z));
        assert!(approx(t.right(), Vec3::X));
        assert!(approx(t.up(), Vec3::Y));
    }

    #[test]
    fn yaw_quarter_turn_faces_negative_x() {
        let t = Transform::from_yaw_pitch(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 0.0);
        assert!(approx(t.forward(), Vec3::NEG_X));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut t = Transform::default();
        t.rotate_x(10.0);
        assert!((t.pitch() - MAX_PITCH).abs() < 1e-6);
        assert!(t.forward().y > 0.99);
        t.rotate_x(-20.0);
        assert!((t.pitch() + MAX_PITCH).abs() < 1e-6);
    }

    #[test]
    fn non_finite_angles_are_ignored() {
        let mut t = Transform::from_yaw_pitch(Vec3::ZERO, 0.5, 0.1);
        t.set_yaw_pitch(f32::NAN, 0.0);
        assert!((t.yaw() - 0.5).abs() < 1e-6);
        assert!(t.forward().is_finite());
    }
}
