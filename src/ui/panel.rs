// src/ui/panel.rs
//! Default UI panels

use crate::highlight::HoverStatus;

/// Small fixed panel showing what the pointer is over
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `status` - Latest hover status
/// * `hint` - Optional line shown under the status, e.g. control help
pub fn hover_status_panel(ui: &imgui::Ui, status: &HoverStatus, hint: Option<&str>) {
    let display_size = ui.io().display_size;
    // Guard against a minimised window
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("Hover")
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .resizable(false)
        .collapsible(false)
        .movable(false)
        .build(|| {
            match status {
                HoverStatus::Hovering(_) => {
                    ui.text_colored([1.0, 0.4, 0.4, 1.0], status.to_string());
                }
                HoverStatus::NotHovering => ui.text_disabled(status.to_string()),
            }

            if let Some(hint) = hint {
                ui.separator();
                ui.text_wrapped(hint);
            }
        });
}
