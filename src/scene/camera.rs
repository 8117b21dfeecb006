//! First-person fly camera.
//!
//! Orientation is a horizontal angle plus a vertical offset rather than
//! Euler angles or a quaternion. The aim direction is rebuilt every frame
//! as `normalize(cos(angle), offset, sin(angle))`.

use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

use crate::resources::input::{Input, Key, MouseButton};

/// Speed multiplier while sprint is held.
pub const SPRINT_FACTOR: f32 = 3.0;

/// Cursor requests produced by mouse-look, applied by the window layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorCommand {
    Hide,
    Show,
    /// Warp the cursor to this position (physical pixels).
    Recenter(Vec2),
}

pub type CursorCommands = SmallVec<[CursorCommand; 2]>;

#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Horizontal aim angle in radians.
    pub angle: f32,
    /// Vertical component of the unnormalized aim vector.
    pub vertical_offset: f32,

    pub move_speed: f32,
    pub sensitivity: f32,

    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    look_engaged: bool,
}

impl FlyCamera {
    #[must_use]
    pub fn new(position: Vec3, angle: f32) -> Self {
        Self {
            position,
            angle,
            vertical_offset: 0.0,
            move_speed: 2.4,
            sensitivity: 1.0,
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            look_engaged: false,
        }
    }

    /// Unit aim direction.
    #[inline]
    #[must_use]
    pub fn aim_dir(&self) -> Vec3 {
        Vec3::new(self.angle.cos(), self.vertical_offset, self.angle.sin()).normalize()
    }

    /// Unit strafe direction (aim × world-up).
    #[inline]
    #[must_use]
    pub fn right_dir(&self) -> Vec3 {
        self.aim_dir().cross(Vec3::Y).normalize_or_zero()
    }

    #[inline]
    #[must_use]
    pub fn is_look_engaged(&self) -> bool {
        self.look_engaged
    }

    /// Applies one frame of mouse-look and movement.
    ///
    /// While the left button is held the cursor is hidden and recentred every
    /// frame, and look deltas are measured from the raster centre. The first
    /// engaged frame contributes no rotation.
    pub fn update(&mut self, input: &Input, dt: f32) -> CursorCommands {
        let mut commands = CursorCommands::new();

        if input.get_mouse_button(MouseButton::Left) {
            let raster = input.screen_size().max(Vec2::ONE);
            let centre = raster * 0.5;

            let delta = if self.look_engaged {
                input.mouse_position() - centre
            } else {
                commands.push(CursorCommand::Hide);
                Vec2::ZERO
            };

            self.vertical_offset -= self.sensitivity * delta.y / raster.y;
            self.angle += self.sensitivity * delta.x / raster.x;

            commands.push(CursorCommand::Recenter(centre));
            self.look_engaged = true;
        } else if self.look_engaged {
            self.look_engaged = false;
            commands.push(CursorCommand::Show);
        }

        let speed = if input.get_key(Key::ShiftLeft) {
            self.move_speed * SPRINT_FACTOR
        } else {
            self.move_speed
        };
        let step = speed * dt;

        let aim = self.aim_dir();
        let right = self.right_dir();

        if input.get_key(Key::W) {
            self.position += aim * step;
        }
        if input.get_key(Key::S) {
            self.position -= aim * step;
        }
        if input.get_key(Key::D) {
            self.position += right * step;
        }
        if input.get_key(Key::A) {
            self.position -= right * step;
        }
        if input.get_key(Key::Space) {
            self.position.y += step;
        }
        if input.get_key(Key::ControlLeft) {
            self.position.y -= step;
        }

        commands
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.aim_dir(), Vec3::Y)
    }

    /// Perspective projection with a 0..1 depth range.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }
}
