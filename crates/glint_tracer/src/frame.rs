//! The read-only inputs every pixel of a frame shares.

use glint_core::{Environment, FrameSettings, SceneSnapshot};
use glint_math::CameraParams;

/// Frozen per-frame inputs.
///
/// Borrowed immutably by every worker; nothing in here changes while a frame
/// is being traced.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a SceneSnapshot,
    pub settings: &'a FrameSettings,
    pub camera: &'a CameraParams,
    pub environment: &'a dyn Environment,
}

impl<'a> Frame<'a> {
    pub fn new(
        scene: &'a SceneSnapshot,
        settings: &'a FrameSettings,
        camera: &'a CameraParams,
        environment: &'a dyn Environment,
    ) -> Self {
        Self {
            scene,
            settings,
            camera,
            environment,
        }
    }
}
