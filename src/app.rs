//! Viewer state and per-frame keyboard input
//!
//! Holds the fixed demo camera, the basis set and the light rig, and maps
//! held keys to light movement once per frame. All light mutation happens
//! here, before the frame's first lighting read; the rest of the pipeline
//! only borrows the rig.

use macroquad::prelude::{is_key_down, is_key_pressed, KeyCode};

use crate::basis::BasisSet;
use crate::fixed::Fixed32;
use crate::lighting::LightRig;
use crate::rasterizer::{Camera, Vec3};

/// Raw 4.12 units a held movement key travels per frame
const LIGHT_STEP: i32 = 64;

/// Camera pitch toward the floor, degrees (positive pitches down)
const DEMO_PITCH_DEGREES: f32 = 22.5;

/// Viewer application state
pub struct App {
    pub camera: Camera,
    pub basis: BasisSet,
    pub rig: LightRig,
    /// Three-pass compositing on, single flat-lit pass off
    pub enhanced: bool,
}

impl App {
    pub const HINT: &'static str =
        "Arrows+Shift: white light | IJKL+UO: red light | Space: toggle | Esc: quit";

    pub fn new(rig: LightRig) -> Self {
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 1.0, -2.0);
        camera.rotation_x = DEMO_PITCH_DEGREES.to_radians();
        camera.rotation_y = 0.0;
        camera.update_basis();

        Self {
            camera,
            basis: BasisSet::new(),
            rig,
            enhanced: true,
        }
    }

    /// Apply one frame of keyboard input.
    ///
    /// Returns false when the viewer should exit. Light movement keys act
    /// while held; the lighting toggle is edge-triggered.
    pub fn handle_input(&mut self) -> bool {
        if is_key_pressed(KeyCode::Escape) {
            return false;
        }
        if is_key_pressed(KeyCode::Space) {
            self.enhanced = !self.enhanced;
        }

        // Key light: arrows move in x/z, holding LeftShift turns the
        // up/down arrows into height control
        let dx = screen_x_step(is_key_down(KeyCode::Left), is_key_down(KeyCode::Right));
        let fwd = axis(is_key_down(KeyCode::Up), is_key_down(KeyCode::Down));
        if is_key_down(KeyCode::LeftShift) {
            self.move_light(0, dx, fwd, 0);
        } else {
            self.move_light(0, dx, 0, fwd);
        }

        // Fill light: IJKL in x/z, U/O for height
        self.move_light(
            1,
            screen_x_step(is_key_down(KeyCode::J), is_key_down(KeyCode::L)),
            axis(is_key_down(KeyCode::U), is_key_down(KeyCode::O)),
            axis(is_key_down(KeyCode::I), is_key_down(KeyCode::K)),
        );

        true
    }

    /// Nudge one light by steps of [`LIGHT_STEP`] raw units per axis.
    ///
    /// Indices past the rig's light count are ignored, so a config with a
    /// single light still runs with half the controls inert.
    pub fn move_light(&mut self, index: usize, dx: i32, dy: i32, dz: i32) {
        if let Some(light) = self.rig.lights.get_mut(index) {
            light.pos.x = light.pos.x + Fixed32(dx * LIGHT_STEP);
            light.pos.y = light.pos.y + Fixed32(dy * LIGHT_STEP);
            light.pos.z = light.pos.z + Fixed32(dz * LIGHT_STEP);
        }
    }

    /// HUD status line for the current lighting mode
    pub fn status_line(&self) -> &'static str {
        if self.enhanced {
            "Enhanced lighting ON (3 passes)"
        } else {
            "Enhanced lighting OFF (1 pass)"
        }
    }
}

/// Held-key pair to a -1/0/+1 step
#[inline]
fn axis(positive: bool, negative: bool) -> i32 {
    positive as i32 - negative as i32
}

/// World-x step for a held left/right key pair. The camera basis mirrors
/// world x on screen, so the right-hand key steps x negative.
#[inline]
fn screen_x_step(left: bool, right: bool) -> i32 {
    axis(left, right)
}
