// ============================================================================
// camera.rs — Sketchbook
// First-person LookAt camera (dolly / truck / pan) and the held-key motion
// state that drives it.
// ============================================================================

use glam::{Mat4, Quat, Vec3};
use winit::keyboard::{Key, NamedKey};

use crate::input::key_is;

/// Camera defined by an eye, a target and an up vector.
#[derive(Clone, Debug, PartialEq)]
pub struct LookAtCamera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LookAtCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.5, 2.5),
            at: Vec3::new(0.0, 0.5, 0.0),
            up: Vec3::Y,
            fov_y_degrees: 70.0,
            near: 0.1,
            far: 5.0,
        }
    }
}

impl LookAtCamera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    fn forward(&self) -> Vec3 {
        (self.at - self.eye).normalize_or_zero()
    }

    /// Move eye and target along the viewing direction.
    pub fn dolly(&mut self, speed: f32) {
        let step = self.forward() * speed;
        self.eye += step;
        self.at += step;
    }

    /// Move eye and target sideways. Positive speed moves right.
    pub fn truck(&mut self, speed: f32) {
        let left = self.up.cross(self.forward());
        self.eye -= left * speed;
        self.at -= left * speed;
    }

    /// Turn the target around the eye. Positive speed turns left.
    pub fn pan(&mut self, speed: f32) {
        let rotation = Quat::from_axis_angle(self.up.normalize_or_zero(), speed);
        self.at = self.eye + rotation * (self.at - self.eye);
    }
}

/// Signed speeds currently requested by the held keys.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraMotion {
    pub dolly: f32,
    pub truck: f32,
    pub pan: f32,
}

impl CameraMotion {
    /// Update from a key event. Releasing a key only stops the motion it
    /// started, so holding both W and S then releasing one does not stop
    /// the other.
    pub fn apply_key(&mut self, key: &Key, pressed: bool) {
        let (axis, sign) = if key_is(key, NamedKey::ArrowUp, Some("w")) {
            (&mut self.dolly, 1.0)
        } else if key_is(key, NamedKey::ArrowDown, Some("s")) {
            (&mut self.dolly, -1.0)
        } else if key_is(key, NamedKey::ArrowLeft, Some("a")) {
            (&mut self.pan, 1.0)
        } else if key_is(key, NamedKey::ArrowRight, Some("d")) {
            (&mut self.pan, -1.0)
        } else if matches!(key, Key::Character(c) if c.eq_ignore_ascii_case("q")) {
            (&mut self.truck, -1.0)
        } else if matches!(key, Key::Character(c) if c.eq_ignore_ascii_case("e")) {
            (&mut self.truck, 1.0)
        } else {
            return;
        };

        if pressed {
            *axis = sign;
        } else if *axis == sign {
            *axis = 0.0;
        }
    }

    pub fn apply(&self, camera: &mut LookAtCamera, dt: f32) {
        camera.dolly(self.dolly * dt);
        camera.truck(self.truck * dt);
        camera.pan(self.pan * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn letter(c: &str) -> Key {
        Key::Character(SmolStr::new(c))
    }

    #[test]
    fn dolly_keeps_eye_target_distance() {
        let mut camera = LookAtCamera::default();
        let before = camera.eye.distance(camera.at);
        camera.dolly(0.7);
        assert!((camera.eye.distance(camera.at) - before).abs() < 1e-5);
        assert!((camera.eye.z - 1.8).abs() < 1e-5);
    }

    #[test]
    fn truck_keeps_viewing_direction() {
        let mut camera = LookAtCamera::default();
        let forward = camera.forward();
        camera.truck(0.5);
        assert!(camera.forward().abs_diff_eq(forward, 1e-5));
        assert!((camera.eye.x - 0.5).abs() < 1e-5, "truck right moves +x");
    }

    #[test]
    fn pan_rotates_target_around_eye() {
        let mut camera = LookAtCamera::default();
        let eye = camera.eye;
        let distance = eye.distance(camera.at);
        camera.pan(std::f32::consts::FRAC_PI_2);
        assert_eq!(camera.eye, eye);
        assert!((camera.eye.distance(camera.at) - distance).abs() < 1e-5);
        assert!(camera.at.x < -2.0, "pan left turns toward -x");
    }

    #[test]
    fn release_only_clears_matching_motion() {
        let mut motion = CameraMotion::default();
        motion.apply_key(&letter("w"), true);
        motion.apply_key(&Key::Named(NamedKey::ArrowDown), true);
        assert_eq!(motion.dolly, -1.0);

        motion.apply_key(&letter("W"), false);
        assert_eq!(motion.dolly, -1.0);
        motion.apply_key(&letter("s"), false);
        assert_eq!(motion.dolly, 0.0);
    }

    #[test]
    fn q_and_e_truck() {
        let mut motion = CameraMotion::default();
        motion.apply_key(&letter("q"), true);
        assert_eq!(motion.truck, -1.0);
        motion.apply_key(&letter("E"), true);
        assert_eq!(motion.truck, 1.0);
        motion.apply_key(&Key::Named(NamedKey::ArrowLeft), true);
        assert_eq!(motion.pan, 1.0);
    }

    #[test]
    fn projection_is_finite_for_degenerate_aspect() {
        let camera = LookAtCamera::default();
        assert!(camera.projection_matrix(0.0).is_finite());
    }
}
