//! Host-facing entry point for 3D editing.
//!
//! [`Editor3d`] owns the free camera and the selection sync for one
//! viewport. The host forwards input through [`Editor3d::handle_input`],
//! calls [`Editor3d::update`] once per frame and keeps the selection current
//! with [`Editor3d::set_selection`].
//!
//! Keyboard shortcuts (no ctrl/alt, ignored mid-drag):
//!
//! | Key | Action |
//! |-----|--------|
//! | T | Translate mode |
//! | R | Rotate mode |
//! | S | Scale mode, only while the free camera is off (S moves it back) |
//! | X | Toggle local/world space |

use crate::camera::FreeCameraController;
use crate::config::Editor3dConfig;
use crate::history::{EditHistory, TransformEdit};
use crate::input::{InputEvent, Key, Modifiers, SharedInputSurface};
use crate::instance::{InstanceId, InstanceStore};
use crate::scene::{SharedCamera, SharedScene};
use crate::sync::{NodeMap, SelectionSync, TransformCompleted, TransformKind};
use crate::toolbar::{ToolbarAction, ToolbarState};
use crate::widget::GizmoMode;

/// Viewport resources the 3D tools need. Scene and camera are absent when
/// the host has no 3D renderer.
#[derive(Clone)]
pub struct Viewport3dContext {
    pub scene: Option<SharedScene>,
    pub camera: Option<SharedCamera>,
    pub input: SharedInputSurface,
}

impl Viewport3dContext {
    pub fn new(scene: Option<SharedScene>, camera: Option<SharedCamera>, input: SharedInputSurface) -> Self {
        Self { scene, camera, input }
    }

    pub fn is_available(&self) -> bool {
        self.scene.is_some() && self.camera.is_some()
    }
}

/// 3D editing tools of one viewport.
pub struct Editor3d {
    input: SharedInputSurface,
    camera: Option<FreeCameraController>,
    sync: SelectionSync,
    toolbar: ToolbarState,
    history: EditHistory,
}

impl Editor3d {
    /// Build the camera controller, gizmo and selection sync.
    ///
    /// An invalid `config` is replaced by the defaults. Without a scene and
    /// camera nothing is built and every operation is a no-op.
    pub fn initialize(context: Viewport3dContext, config: &Editor3dConfig) -> Self {
        let fallback;
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("Invalid 3D editor settings, using defaults: {}", err);
                fallback = Editor3dConfig::default();
                &fallback
            }
        };

        let camera = match (&context.camera, context.is_available()) {
            (Some(camera), true) => {
                let mut controller =
                    FreeCameraController::new(camera.clone(), context.input.clone(), config.camera.clone());
                if config.free_camera_enabled {
                    controller.enable();
                }
                Some(controller)
            }
            _ => None,
        };
        let sync = SelectionSync::new(&context, &config.gizmo);

        let mut editor = Self {
            input: context.input,
            camera,
            sync,
            toolbar: ToolbarState::default(),
            history: EditHistory::new(),
        };
        editor.refresh_toolbar();

        log::info!(
            "3D editing initialized (gizmo available: {}, free camera: {})",
            editor.sync.is_available(),
            editor.toolbar.free_camera_enabled
        );
        editor
    }

    pub fn is_available(&self) -> bool {
        self.sync.is_available()
    }

    pub fn toolbar(&self) -> &ToolbarState {
        &self.toolbar
    }

    pub fn camera(&self) -> Option<&FreeCameraController> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut FreeCameraController> {
        self.camera.as_mut()
    }

    pub fn sync(&self) -> &SelectionSync {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut SelectionSync {
        &mut self.sync
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Register the host callback for applied edits.
    pub fn on_transform_completed<F>(&mut self, callback: F)
    where
        F: FnMut(InstanceId, TransformKind) + 'static,
    {
        self.sync.on_transform_completed(callback);
    }

    fn free_camera_enabled(&self) -> bool {
        self.camera.as_ref().is_some_and(FreeCameraController::is_enabled)
    }

    /// Mirror the live controller state into the toolbar flags.
    fn refresh_toolbar(&mut self) {
        self.toolbar.gizmo_mode = self.sync.current_mode();
        self.toolbar.gizmo_space = self.sync.current_space();
        self.toolbar.gizmo_enabled = self.sync.is_enabled();
        self.toolbar.free_camera_enabled = self.free_camera_enabled();
    }

    /// Carry out a toolbar action.
    pub fn apply_toolbar_action(&mut self, action: ToolbarAction) {
        self.toolbar.apply(action);
        match action {
            ToolbarAction::SetGizmoMode(mode) => self.sync.set_mode(mode),
            ToolbarAction::ToggleGizmo => self.sync.set_enabled(self.toolbar.gizmo_enabled),
            ToolbarAction::ToggleGizmoSpace => self.sync.toggle_space(),
            ToolbarAction::ToggleFreeCamera => {
                if let Some(camera) = self.camera.as_mut() {
                    if self.toolbar.free_camera_enabled {
                        camera.enable();
                    } else {
                        camera.disable();
                    }
                }
            }
        }
        self.refresh_toolbar();
    }

    /// Map a key press to a toolbar action.
    pub fn shortcut_action(&self, key: Key, modifiers: Modifiers) -> Option<ToolbarAction> {
        if modifiers.ctrl || modifiers.alt || !self.sync.is_available() || self.sync.is_dragging() {
            return None;
        }
        match key {
            Key::Character('t') => Some(ToolbarAction::SetGizmoMode(GizmoMode::Translate)),
            Key::Character('r') => Some(ToolbarAction::SetGizmoMode(GizmoMode::Rotate)),
            Key::Character('s') if !self.free_camera_enabled() => {
                Some(ToolbarAction::SetGizmoMode(GizmoMode::Scale))
            }
            Key::Character('x') => Some(ToolbarAction::ToggleGizmoSpace),
            _ => None,
        }
    }

    /// Handle a viewport input event. Returns true if it was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::KeyDown { key, modifiers } = *event {
            if let Some(action) = self.shortcut_action(key, modifiers) {
                log::trace!("Shortcut {:?} -> {:?}", key, action);
                self.apply_toolbar_action(action);
                return true;
            }
        }
        self.input.borrow_mut().dispatch(event)
    }

    /// Replace the selection.
    pub fn set_selection(&mut self, instances: &[InstanceId], node_map: &NodeMap) {
        self.sync.update_selection(instances, node_map);
    }

    /// Per-frame tick: advance the camera and apply committed gizmo edits.
    pub fn update(&mut self, store: &mut InstanceStore) -> Vec<TransformCompleted> {
        if let Some(camera) = self.camera.as_mut() {
            camera.update();
        }
        let completed = self.sync.process_events(store);
        for edit in &completed {
            self.history.record(TransformEdit::from(*edit));
        }
        completed
    }

    /// Undo the last gizmo edit. The host re-syncs the instance's node.
    pub fn undo(&mut self, store: &mut InstanceStore) -> Option<InstanceId> {
        if self.sync.is_dragging() {
            return None;
        }
        self.history.undo(store)
    }

    pub fn redo(&mut self, store: &mut InstanceStore) -> Option<InstanceId> {
        if self.sync.is_dragging() {
            return None;
        }
        self.history.redo(store)
    }

    /// Release input handlers and detach the gizmo.
    pub fn dispose(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            camera.dispose();
        }
        self.sync.dispose();
        self.refresh_toolbar();
        log::debug!("3D editing disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSurface;
    use crate::scene::{Camera3d, SceneGraph};
    use crate::shared;
    use crate::widget::GizmoSpace;
    use glam::Vec3;

    fn editor(free_camera: bool) -> (Editor3d, SharedInputSurface) {
        let input = shared(InputSurface::new());
        let context = Viewport3dContext::new(
            Some(shared(SceneGraph::new())),
            Some(shared(Camera3d::new(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.0, 0.1, 100.0))),
            input.clone(),
        );
        let config = Editor3dConfig {
            free_camera_enabled: free_camera,
            ..Default::default()
        };
        (Editor3d::initialize(context, &config), input)
    }

    fn key(c: char) -> InputEvent {
        InputEvent::KeyDown {
            key: Key::character(c),
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_mode_shortcuts() {
        let (mut editor, _) = editor(false);
        assert!(editor.handle_input(&key('R')));
        assert_eq!(editor.toolbar().gizmo_mode, GizmoMode::Rotate);
        assert!(editor.handle_input(&key('s')));
        assert_eq!(editor.sync().current_mode(), GizmoMode::Scale);
        assert!(editor.handle_input(&key('x')));
        assert_eq!(editor.toolbar().gizmo_space, GizmoSpace::Local);
    }

    #[test]
    fn test_s_goes_to_camera_when_free_camera_on() {
        let (mut editor, _) = editor(true);
        assert!(!editor.handle_input(&key('s')));
        assert_eq!(editor.toolbar().gizmo_mode, GizmoMode::Translate);
    }

    #[test]
    fn test_ctrl_shortcuts_ignored() {
        let (editor, _) = editor(false);
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(editor.shortcut_action(Key::character('t'), ctrl), None);
    }

    #[test]
    fn test_toggle_free_camera_subscribes() {
        let (mut editor, input) = editor(false);
        let gizmo_handlers = input.borrow().subscriber_count();

        editor.apply_toolbar_action(ToolbarAction::ToggleFreeCamera);
        assert!(editor.toolbar().free_camera_enabled);
        assert!(input.borrow().subscriber_count() > gizmo_handlers);

        editor.apply_toolbar_action(ToolbarAction::ToggleFreeCamera);
        assert_eq!(input.borrow().subscriber_count(), gizmo_handlers);
    }

    #[test]
    fn test_unavailable_context() {
        let input = shared(InputSurface::new());
        let context = Viewport3dContext::new(None, None, input);
        let mut editor = Editor3d::initialize(context, &Editor3dConfig::default());
        assert!(!editor.is_available());
        assert!(editor.camera().is_none());

        editor.apply_toolbar_action(ToolbarAction::ToggleFreeCamera);
        assert!(!editor.toolbar().free_camera_enabled);
        assert!(!editor.handle_input(&key('t')));
    }

    #[test]
    fn test_camera_without_scene_builds_nothing() {
        let input = shared(InputSurface::new());
        let camera = shared(Camera3d::new(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.0, 0.1, 100.0));
        let context = Viewport3dContext::new(None, Some(camera), input.clone());
        let config = Editor3dConfig {
            free_camera_enabled: true,
            ..Default::default()
        };
        let editor = Editor3d::initialize(context, &config);

        assert!(!editor.is_available());
        assert!(editor.camera().is_none());
        assert!(!editor.toolbar().free_camera_enabled);
        assert_eq!(input.borrow().subscriber_count(), 0);
    }

    #[test]
    fn test_invalid_settings_fall_back_to_defaults() {
        let input = shared(InputSurface::new());
        let context = Viewport3dContext::new(
            Some(shared(SceneGraph::new())),
            Some(shared(Camera3d::new(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 1.0, 0.1, 100.0))),
            input,
        );
        let mut config = Editor3dConfig {
            free_camera_enabled: true,
            ..Default::default()
        };
        config.camera.min_distance = f32::NAN;
        config.camera.min_polar_angle = 2.0;
        config.camera.max_polar_angle = 1.0;

        let mut editor = Editor3d::initialize(context, &config);
        editor.update(&mut InstanceStore::new());
        let camera = editor.camera().unwrap();
        assert_eq!(camera.settings(), crate::config::CameraSettings::default());
        assert!(!camera.is_enabled());
    }
}
