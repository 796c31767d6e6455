//! Toolbar state for the 3D editing tools.
//!
//! Pure data: the flags a toolbar displays and the actions its buttons
//! produce. [`crate::Editor3d::apply_toolbar_action`] carries the actions out.

use serde::{Deserialize, Serialize};

use crate::widget::{GizmoMode, GizmoSpace};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarState {
    pub gizmo_mode: GizmoMode,
    pub gizmo_enabled: bool,
    pub gizmo_space: GizmoSpace,
    pub free_camera_enabled: bool,
}

impl Default for ToolbarState {
    fn default() -> Self {
        Self {
            gizmo_mode: GizmoMode::Translate,
            gizmo_enabled: true,
            gizmo_space: GizmoSpace::World,
            free_camera_enabled: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolbarAction {
    SetGizmoMode(GizmoMode),
    ToggleGizmo,
    ToggleGizmoSpace,
    ToggleFreeCamera,
}

impl ToolbarState {
    /// Update the flags for `action`.
    pub fn apply(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::SetGizmoMode(mode) => self.gizmo_mode = mode,
            ToolbarAction::ToggleGizmo => self.gizmo_enabled = !self.gizmo_enabled,
            ToolbarAction::ToggleGizmoSpace => self.gizmo_space = self.gizmo_space.toggled(),
            ToolbarAction::ToggleFreeCamera => self.free_camera_enabled = !self.free_camera_enabled,
        }
    }

    /// Button label for the space toggle.
    pub fn space_label(&self) -> &'static str {
        self.gizmo_space.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_flip_flags() {
        let mut state = ToolbarState::default();
        state.apply(ToolbarAction::SetGizmoMode(GizmoMode::Scale));
        state.apply(ToolbarAction::ToggleGizmo);
        state.apply(ToolbarAction::ToggleFreeCamera);
        state.apply(ToolbarAction::ToggleGizmoSpace);

        assert_eq!(state.gizmo_mode, GizmoMode::Scale);
        assert!(!state.gizmo_enabled);
        assert!(state.free_camera_enabled);
        assert_eq!(state.space_label(), "Local");
    }
}
