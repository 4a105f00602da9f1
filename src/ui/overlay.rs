//! Hover status display

use std::{cell::RefCell, rc::Rc, sync::Arc};

use winit::window::Window;

use crate::{
    gfx::{rendering::FrameOverlay, surface::SurfaceSize},
    highlight::{HoverStatus, StatusSink},
};

use super::{manager::UiManager, panel::hover_status_panel};

/// Shared latest hover status
///
/// Cloning shares the same status, so one clone can be handed to the viewer
/// as its sink while another is read by the overlay.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    current: Rc<RefCell<HoverStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> HoverStatus {
        self.current.borrow().clone()
    }
}

impl StatusSink for StatusBoard {
    fn publish(&mut self, status: &HoverStatus) {
        let mut current = self.current.borrow_mut();
        if *current != *status {
            log::info!("{status}");
            *current = status.clone();
        }
    }
}

/// Draws the status panel on top of every frame
pub struct StatusOverlay {
    ui: UiManager,
    window: Arc<Window>,
    board: StatusBoard,
    hint: Option<String>,
}

impl StatusOverlay {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        window: Arc<Window>,
        board: StatusBoard,
    ) -> Self {
        let ui = UiManager::new(device, queue, format, &window);
        Self {
            ui,
            window,
            board,
            hint: None,
        }
    }

    /// Builder pattern: Show a help line under the status
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }
}

impl FrameOverlay for StatusOverlay {
    fn resize(&mut self, size: SurfaceSize) {
        self.ui.update_display_size(size.width, size.height);
    }

    fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.ui.handle_input(&self.window, self.window.id(), event)
    }

    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let status = self.board.current();
        let hint = self.hint.as_deref();
        self.ui.draw(device, queue, encoder, &self.window, view, |ui| {
            hover_status_panel(ui, &status, hint)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_clones_share_status() {
        let board = StatusBoard::new();
        let mut sink = board.clone();
        assert_eq!(board.current(), HoverStatus::NotHovering);

        sink.publish(&HoverStatus::Hovering("sphere1".into()));
        assert_eq!(board.current().to_string(), "hovering over sphere1");
    }
}
