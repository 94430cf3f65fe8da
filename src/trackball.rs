// ============================================================================
// trackball.rs — Sketchbook
// Virtual-sphere trackball: mouse drags become rotations that keep spinning
// after release.
// ============================================================================

use glam::{Quat, Vec2, Vec3};

use crate::timer::ElapsedTimer;

const MAX_VELOCITY: f32 = 12.0;
/// A release this long after the last drag stops the spin.
const RELEASE_STILL_SECONDS: f64 = 0.1;

pub struct TrackBall {
    axis: Vec3,
    velocity: f32,
    rotation: Quat,
    last_position: Vec3,
    tracking: bool,
    clock: ElapsedTimer,
    viewport: Vec2,
}

impl TrackBall {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            axis: Vec3::Y,
            velocity: 0.0,
            rotation: Quat::IDENTITY,
            last_position: Vec3::Z,
            tracking: false,
            clock: ElapsedTimer::new(),
            viewport,
        }
    }

    pub fn resize_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Map a window position to a point on the unit hemisphere facing the
    /// viewer. Points outside the sphere are projected onto its rim.
    pub fn project(&self, position: Vec2) -> Vec3 {
        let size = self.viewport.max(Vec2::ONE);
        let p = Vec2::new(2.0 * position.x / size.x - 1.0, 1.0 - 2.0 * position.y / size.y);
        let squared = p.length_squared();
        if squared <= 1.0 {
            Vec3::new(p.x, p.y, (1.0 - squared).sqrt())
        } else {
            p.normalize().extend(0.0)
        }
    }

    pub fn mouse_press(&mut self, position: Vec2) {
        self.rotation = self.rotation();
        self.velocity = 0.0;
        self.tracking = true;
        self.last_position = self.project(position);
        self.clock.restart();
    }

    pub fn mouse_move(&mut self, position: Vec2) {
        if !self.tracking {
            return;
        }
        let current = self.project(position);
        let elapsed = self.clock.elapsed() as f32;
        let angle = self.last_position.angle_between(current);
        let axis = self.last_position.cross(current);

        if angle > f32::EPSILON && axis.length_squared() > f32::EPSILON {
            self.axis = axis.normalize();
            self.rotation = (Quat::from_axis_angle(self.axis, angle) * self.rotation).normalize();
            self.velocity = if elapsed > 0.0 {
                (angle / elapsed).min(MAX_VELOCITY)
            } else {
                0.0
            };
        }

        self.last_position = current;
        self.clock.restart();
    }

    pub fn mouse_release(&mut self, position: Vec2) {
        if !self.tracking {
            return;
        }
        let held_still = self.clock.elapsed() > RELEASE_STILL_SECONDS;
        self.mouse_move(position);
        if held_still {
            self.velocity = 0.0;
        }
        self.tracking = false;
        self.clock.restart();
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Current orientation, including the spin since the last release.
    pub fn rotation(&self) -> Quat {
        if self.tracking {
            return self.rotation;
        }
        self.spin(self.clock.elapsed() as f32)
    }

    /// Orientation after spinning freely for `seconds`.
    pub fn spin(&self, seconds: f32) -> Quat {
        let angle = self.velocity * seconds;
        if angle == 0.0 {
            return self.rotation;
        }
        (Quat::from_axis_angle(self.axis, angle) * self.rotation).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> TrackBall {
        TrackBall::new(Vec2::new(600.0, 600.0))
    }

    #[test]
    fn center_projects_to_front_of_sphere() {
        let p = ball().project(Vec2::new(300.0, 300.0));
        assert!(p.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn outside_points_land_on_rim() {
        let p = ball().project(Vec2::new(600.0, 0.0));
        assert!((p.length() - 1.0).abs() < 1e-6);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn zero_drag_is_identity() {
        let mut ball = ball();
        ball.mouse_press(Vec2::new(300.0, 300.0));
        ball.mouse_move(Vec2::new(300.0, 300.0));
        ball.mouse_release(Vec2::new(300.0, 300.0));
        assert!(ball.rotation().abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn drag_produces_unit_rotation_about_y() {
        let mut ball = ball();
        ball.mouse_press(Vec2::new(300.0, 300.0));
        ball.mouse_move(Vec2::new(400.0, 300.0));
        let rotation = ball.rotation();
        assert!(rotation.is_normalized());
        let (axis, angle) = rotation.to_axis_angle();
        assert!(angle > 0.0);
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-5), "horizontal drag rotates about +Y, got {axis:?}");
    }

    #[test]
    fn spin_continues_with_velocity() {
        let mut ball = ball();
        ball.axis = Vec3::Y;
        ball.velocity = 1.0;
        let spun = ball.spin(0.5);
        assert!(spun.is_normalized());
        assert!((spun.to_axis_angle().1 - 0.5).abs() < 1e-5);
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut ball = ball();
        ball.mouse_move(Vec2::new(100.0, 50.0));
        assert!(!ball.is_tracking());
        assert_eq!(ball.rotation, Quat::IDENTITY);
    }
}
