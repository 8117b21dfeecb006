//! Session and per-frame state.
//!
//! [`SessionState`] is mutated once per frame by [`SessionState::update`],
//! which returns an immutable [`FrameState`] snapshot. The renderer only
//! ever sees the snapshot, so nothing can read camera or selection state
//! before the update step for that frame has finished.

use glam::{Mat4, UVec2, Vec3};

use crate::config::AppConfig;
use crate::renderer::DebugView;
use crate::resources::input::{Input, Key};
use crate::scene::camera::{CursorCommands, FlyCamera};

/// Amplitude of the vertical bob applied alongside auto-rotation.
pub const BOB_AMPLITUDE: f32 = 0.45;

// ============================================================================
// Selector
// ============================================================================

/// An index into a fixed-size catalog that wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    index: usize,
    count: usize,
}

impl Selector {
    /// `count` is clamped to at least one; `index` wraps into range.
    #[must_use]
    pub fn new(index: usize, count: usize) -> Self {
        let count = count.max(1);
        Self {
            index: index % count,
            count,
        }
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    pub fn previous(&mut self) -> usize {
        self.index = (self.index + self.count - 1) % self.count;
        self.index
    }
}

// ============================================================================
// Technique
// ============================================================================

/// Lighting technique used by the composite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Technique {
    /// Blinn-Phong with ambient occlusion.
    #[default]
    Phong,
    /// Phong blended with a cubemap reflection.
    Reflective,
}

impl Technique {
    pub const ALL: [Technique; 2] = [Self::Phong, Self::Reflective];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Phong => "phong",
            Self::Reflective => "reflective",
        }
    }
}

// ============================================================================
// FrameState
// ============================================================================

/// Everything the passes need for one frame. Copied into the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub frame_index: u64,

    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub camera_position: Vec3,

    pub light_direction: Vec3,
    pub light_colour: Vec3,
    pub object_colour: Vec3,
    pub ambient: Vec3,

    pub viewport: UVec2,
    pub mesh_index: usize,
    pub technique: Technique,
    pub ao_bypass: bool,
    pub debug_view: DebugView,
}

/// Side effects requested by an update, applied by the caller.
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    pub cursor: CursorCommands,
    pub exit_requested: bool,
    pub screenshot_requested: bool,
}

// ============================================================================
// SessionState
// ============================================================================

#[derive(Debug, Clone)]
pub struct SessionState {
    pub camera: FlyCamera,
    pub mesh: Selector,
    pub technique: Technique,
    pub debug_view: DebugView,

    pub rotate: bool,
    pub model_angle: f32,
    pub ao_bypass: bool,

    pub light_direction: Vec3,
    pub light_colour: Vec3,
    pub object_colour: Vec3,
    pub ambient: Vec3,

    viewport: UVec2,
    frame_index: u64,
}

impl SessionState {
    /// `viewport` is the render-target size; it never changes afterwards.
    #[must_use]
    pub fn new(config: &AppConfig, viewport: UVec2) -> Self {
        let scene = &config.scene;

        let mut camera = FlyCamera::new(Vec3::from(scene.camera_position), scene.camera_angle);
        camera.move_speed = scene.move_speed;
        camera.sensitivity = scene.mouse_sensitivity;
        camera.fov_degrees = scene.fov_degrees;
        camera.near = scene.near;
        camera.far = scene.far;

        Self {
            camera,
            mesh: Selector::new(scene.default_mesh, scene.meshes.len()),
            technique: Technique::default(),
            debug_view: DebugView::default(),
            rotate: false,
            model_angle: 0.0,
            ao_bypass: false,
            light_direction: Vec3::from(scene.light_direction).normalize_or_zero(),
            light_colour: Vec3::from(scene.light_colour),
            object_colour: Vec3::from(scene.object_colour),
            ambient: Vec3::from(scene.ambient),
            viewport: viewport.max(UVec2::ONE),
            frame_index: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Applies one frame of input and returns the side effects it asked for.
    pub fn update(&mut self, input: &Input, dt: f32) -> UpdateOutcome {
        let mut outcome = UpdateOutcome {
            cursor: self.camera.update(input, dt),
            ..Default::default()
        };

        if input.get_key_down(Key::R) {
            self.rotate = !self.rotate;
        }
        if self.rotate {
            self.model_angle += dt;
        }

        if input.get_key_down(Key::O) {
            self.ao_bypass = !self.ao_bypass;
            log::info!("Ambient occlusion {}", if self.ao_bypass { "bypassed" } else { "enabled" });
        }

        if input.get_key_down(Key::NumpadAdd) || input.get_key_down(Key::Equal) {
            let i = self.mesh.next();
            log::info!("Selected mesh {i}");
        }
        if input.get_key_down(Key::NumpadSubtract) || input.get_key_down(Key::Minus) {
            let i = self.mesh.previous();
            log::info!("Selected mesh {i}");
        }

        for (key, technique) in [(Key::F1, Technique::Phong), (Key::F2, Technique::Reflective)] {
            if input.get_key_down(key) && self.technique != technique {
                self.technique = technique;
                log::info!("Lighting technique: {}", technique.name());
            }
        }

        const VIEW_KEYS: [Key; 5] = [Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4];
        for (i, key) in VIEW_KEYS.into_iter().enumerate() {
            if input.get_key_down(key)
                && let Some(view) = DebugView::from_index(i)
            {
                self.debug_view = view;
                log::info!("Debug view: {}", view.label());
            }
        }

        outcome.screenshot_requested = input.get_key_down(Key::F12);
        outcome.exit_requested = input.get_key(Key::Escape);
        outcome
    }

    /// Snapshot for the render step. Advances the frame counter.
    pub fn frame(&mut self) -> FrameState {
        self.frame_index += 1;
        self.snapshot()
    }

    /// Snapshot without advancing the frame counter.
    #[must_use]
    pub fn snapshot(&self) -> FrameState {
        let aspect = self.viewport.x as f32 / self.viewport.y as f32;
        let projection = self.camera.projection_matrix(aspect);
        let view = self.camera.view_matrix();

        FrameState {
            frame_index: self.frame_index,
            model: self.model_matrix(),
            view,
            projection,
            view_projection: projection * view,
            camera_position: self.camera.position,
            light_direction: self.light_direction,
            light_colour: self.light_colour,
            object_colour: self.object_colour,
            ambient: self.ambient,
            viewport: self.viewport,
            mesh_index: self.mesh.index(),
            technique: self.technique,
            ao_bypass: self.ao_bypass,
            debug_view: self.debug_view,
        }
    }

    /// Rotation about Y with a vertical bob in phase with it.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.model_angle)
            * Mat4::from_translation(Vec3::new(0.0, self.model_angle.sin() * BOB_AMPLITUDE, 0.0))
    }
}
