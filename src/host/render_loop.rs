//! Continuous per-frame rendering

use crate::{error::Result, gfx::device::RenderDevice};

use super::SceneContext;

/// Warnings for a missing camera are logged at the start of a streak and
/// then once every this many ticks.
const MISSING_CAMERA_LOG_INTERVAL: u64 = 600;

/// Renders one frame: render hook, before-render observers, draw,
/// after-render observers
///
/// Callers check for an active camera first; the device rejects frames
/// without one.
pub fn render_scene<D: RenderDevice>(ctx: &mut SceneContext<'_, D>) -> Result<()> {
    if let Some(hook) = ctx.on_render.as_deref_mut() {
        hook(&mut *ctx.graph);
    }
    ctx.graph.notify_before_render();
    ctx.device.render(ctx.graph)?;
    ctx.graph.notify_after_render();
    Ok(())
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// No active camera; a warning was emitted and nothing drawn
    SkippedNoCamera,
    /// The loop was stopped
    Stopped,
}

/// Drives one render per display refresh for the lifetime of the device
///
/// A missing camera never stops the loop: the tick is skipped with a warning
/// and rendering resumes as soon as a camera becomes active.
#[derive(Debug, Default)]
pub struct RenderLoopDriver {
    running: bool,
    frames_rendered: u64,
    missing_camera_warnings: u64,
    missing_camera_streak: u64,
}

impl RenderLoopDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("Render loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Render loop stopped after {} frames", self.frames_rendered);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Ticks that were skipped because no camera was active
    pub fn missing_camera_warnings(&self) -> u64 {
        self.missing_camera_warnings
    }

    pub fn tick<D: RenderDevice>(&mut self, ctx: &mut SceneContext<'_, D>) -> Result<TickOutcome> {
        if !self.running {
            return Ok(TickOutcome::Stopped);
        }

        if !ctx.has_active_camera() {
            self.missing_camera_warnings += 1;
            if self.missing_camera_streak % MISSING_CAMERA_LOG_INTERVAL == 0 {
                log::warn!("no active camera, skipping frame");
            }
            self.missing_camera_streak += 1;
            return Ok(TickOutcome::SkippedNoCamera);
        }

        if self.missing_camera_streak > 0 {
            log::info!("Camera active after {} skipped frames", self.missing_camera_streak);
            self.missing_camera_streak = 0;
        }

        render_scene(ctx)?;
        self.frames_rendered += 1;
        Ok(TickOutcome::Rendered)
    }
}
