//! # User Interface Module
//!
//! A Dear ImGui overlay showing the hover status on top of the scene.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`StatusBoard`] - status sink shared between the viewer and the overlay
//! - [`StatusOverlay`] - frame overlay drawing the [`hover_status_panel`]
//!
//! ## Input Handling
//!
//! Window events are offered to the overlay first. When ImGui wants the
//! mouse or keyboard, camera controls do not see the event.

pub mod manager;
pub mod overlay;
pub mod panel;

pub use manager::UiManager;
pub use overlay::{StatusBoard, StatusOverlay};
pub use panel::hover_status_panel;
