//! First-person fly camera
//!
//! Orientation is stored as yaw/pitch in degrees; the basis vectors are
//! recomputed from them after every update rather than rotated incrementally.

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, Zero};
use winit::keyboard::KeyCode;

use crate::input::FrameEvents;

/// Pitch stays within this many degrees of the horizon
pub const PITCH_LIMIT: f32 = 89.0;

pub const KEY_FORWARD: KeyCode = KeyCode::KeyW;
pub const KEY_BACKWARD: KeyCode = KeyCode::KeyS;
pub const KEY_RIGHT: KeyCode = KeyCode::KeyD;
pub const KEY_LEFT: KeyCode = KeyCode::KeyA;
pub const KEY_UP: KeyCode = KeyCode::ArrowUp;
pub const KEY_DOWN: KeyCode = KeyCode::ArrowDown;
pub const KEY_RESET: KeyCode = KeyCode::KeyR;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    position: Vector3<f32>,
    yaw: f32,
    pitch: f32,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pose: Pose,
    initial: Pose,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    world_up: Vector3<f32>,
    /// World units per second
    pub move_speed: f32,
    /// Degrees per unit of cursor motion
    pub turn_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zero(), 0.0, 0.0, 1.0, 1.0)
    }
}

impl Camera {
    /// Angles in degrees; the pose given here is what [`reset`](Self::reset) restores
    pub fn new(position: Vector3<f32>, yaw: f32, pitch: f32, move_speed: f32, turn_speed: f32) -> Self {
        let pose = Pose {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        };
        let mut camera = Self {
            pose,
            initial: pose,
            front: Vector3::unit_x(),
            right: Vector3::unit_z(),
            up: Vector3::unit_y(),
            world_up: Vector3::unit_y(),
            move_speed,
            turn_speed,
        };
        camera.update_vectors();
        camera
    }

    /// Applies one frame of keyboard and cursor input
    pub fn process_events(&mut self, events: &FrameEvents) {
        let velocity = self.move_speed * events.time_step();
        let moves = [
            (KEY_FORWARD, self.front),
            (KEY_BACKWARD, -self.front),
            (KEY_RIGHT, self.right),
            (KEY_LEFT, -self.right),
            (KEY_UP, self.up),
            (KEY_DOWN, -self.up),
        ];
        for (key, direction) in moves {
            if events.key_state(key) {
                self.pose.position += direction * velocity;
            }
        }
        if events.key_state(KEY_RESET) {
            self.reset();
        }

        self.pose.yaw += events.cursor_change_x() * self.turn_speed;
        self.pose.pitch = (self.pose.pitch + events.cursor_change_y() * self.turn_speed)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.update_vectors();
    }

    /// Restores the construction-time pose
    pub fn reset(&mut self) {
        self.pose = self.initial;
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let yaw = Rad::from(Deg(self.pose.yaw));
        let pitch = Rad::from(Deg(self.pose.pitch));
        self.front = Vector3::new(
            yaw.0.cos() * pitch.0.cos(),
            pitch.0.sin(),
            yaw.0.sin() * pitch.0.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.pose.position);
        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    pub fn position(&self) -> Vector3<f32> {
        self.pose.position
    }

    /// Degrees
    pub fn yaw(&self) -> f32 {
        self.pose.yaw
    }

    /// Degrees
    pub fn pitch(&self) -> f32 {
        self.pose.pitch
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Events for one frame lasting `dt` seconds
    fn frame(dt: f32) -> FrameEvents {
        let mut events = FrameEvents::new();
        events.set_time(0.0);
        events.set_time(dt);
        events
    }

    /// Cursor motion in the camera's convention (positive y looks up)
    fn turn(events: &mut FrameEvents, dx: f32, dy: f32) {
        events.add_cursor_delta(dx, -dy);
    }

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert_abs_diff_eq!(f.magnitude(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(r.magnitude(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(u.magnitude(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(f.dot(r), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(f.dot(u), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(r.dot(u), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_default_basis() {
        let camera = Camera::default();
        assert_abs_diff_eq!(camera.front(), Vector3::unit_x(), epsilon = 1e-6);
        assert_abs_diff_eq!(camera.right(), Vector3::unit_z(), epsilon = 1e-6);
        assert_abs_diff_eq!(camera.up(), Vector3::unit_y(), epsilon = 1e-6);
    }

    #[test]
    fn test_movement_composes_additively() {
        let mut camera = Camera::default();
        let mut events = frame(1.0);
        for key in [KEY_FORWARD, KEY_RIGHT, KEY_UP] {
            events.set_key_state(key, true);
        }
        camera.process_events(&events);
        assert_abs_diff_eq!(camera.position(), Vector3::new(1.0, 1.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_move_speed_scales_displacement() {
        let mut camera = Camera::new(Vector3::zero(), 0.0, 0.0, 4.0, 1.0);
        let mut events = frame(0.5);
        events.set_key_state(KEY_BACKWARD, true);
        camera.process_events(&events);
        assert_abs_diff_eq!(camera.position(), Vector3::new(-2.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_yaw_turns_front() {
        let mut camera = Camera::default();
        let mut events = frame(0.0);
        turn(&mut events, 45.0, 0.0);
        camera.process_events(&events);

        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(camera.front(), Vector3::new(half, 0.0, half), epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        let mut events = frame(0.0);
        turn(&mut events, 0.0, 90.0);
        camera.process_events(&events);

        assert_eq!(camera.pitch(), PITCH_LIMIT);
        assert!(camera.front().y < 1.0);
        assert!(camera.front().x > 0.0);

        let mut events = frame(0.0);
        turn(&mut events, 0.0, -500.0);
        camera.process_events(&events);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
        assert!(camera.front().y > -1.0);
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let origin = Vector3::new(1.0, 2.0, 3.0);
        let mut camera = Camera::new(origin, -90.0, 10.0, 2.0, 0.5);
        let initial_front = camera.front();

        let mut events = frame(0.25);
        events.set_key_state(KEY_FORWARD, true);
        events.set_key_state(KEY_LEFT, true);
        turn(&mut events, 30.0, -12.0);
        for _ in 0..5 {
            camera.process_events(&events);
        }
        assert_ne!(camera.position(), origin);

        camera.reset();
        assert_eq!(camera.position(), origin);
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 10.0);
        assert_eq!(camera.front(), initial_front);

        camera.reset();
        assert_eq!(camera.position(), origin);
    }

    #[test]
    fn test_reset_key_wins_over_movement() {
        let mut camera = Camera::default();
        let mut events = frame(1.0);
        events.set_key_state(KEY_FORWARD, true);
        events.set_key_state(KEY_RESET, true);
        camera.process_events(&events);
        assert_eq!(camera.position(), Vector3::zero());
    }

    #[test]
    fn test_basis_stays_orthonormal() {
        let keys = [KEY_FORWARD, KEY_BACKWARD, KEY_RIGHT, KEY_LEFT, KEY_UP, KEY_DOWN];
        let mut rng = StdRng::seed_from_u64(0x5ce9e);
        let mut camera = Camera::new(Vector3::zero(), 0.0, 0.0, 3.0, 0.7);

        for _ in 0..500 {
            let mut events = frame(rng.random_range(0.0..0.1));
            for key in keys {
                events.set_key_state(key, rng.random_bool(0.3));
            }
            turn(
                &mut events,
                rng.random_range(-200.0..200.0),
                rng.random_range(-200.0..200.0),
            );
            camera.process_events(&events);

            assert_orthonormal(&camera);
            assert!(camera.pitch().abs() <= PITCH_LIMIT);
        }
    }

    #[test]
    fn test_view_matrix_looks_along_front() {
        use cgmath::Transform;
        let camera = Camera::new(Vector3::new(0.0, 1.0, 0.0), 0.0, 0.0, 1.0, 1.0);
        let p = camera
            .view_matrix()
            .transform_point(Point3::new(5.0, 1.0, 0.0));
        // a point straight ahead sits on the negative view z axis
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }
}
