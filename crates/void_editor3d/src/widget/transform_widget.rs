//! The interactive transform widget.
//!
//! Tracks the attached node, mode, space and the active drag. While a
//! handle is dragged the widget writes the node transform directly and
//! reports progress on its notification channel:
//!
//! - [`WidgetEvent::DraggingChanged`] when a drag starts or stops
//! - [`WidgetEvent::Change`] after every transform update
//! - [`WidgetEvent::ObjectChange`] once when a drag that moved the node ends
//!
//! Notifications name the node and carry the transform as it was when they
//! were sent, so a consumer that drains the channel later in the frame sees
//! each edit as it happened, even if another drag has started since.

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::{Vec2, Vec3};

use super::handle::{GizmoMode, GizmoPart, GizmoSpace, Handle, InteractionState};
use super::rotate::RotateHandle;
use super::scale::ScaleHandle;
use super::translate::TranslateHandle;
use crate::config::SnapSettings;
use crate::input::MouseButton;
use crate::scene::{NodeId, Ray, SharedCamera, SharedScene, TransformSnapshot};

/// Raw widget notifications.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidgetEvent {
    /// The node transform was written
    Change(NodeId, TransformSnapshot),
    /// A drag in the given mode finished and moved the node
    ObjectChange(NodeId, GizmoMode, TransformSnapshot),
    DraggingChanged(bool),
}

/// Transform widget bound to one scene and camera.
pub struct TransformWidget {
    scene: SharedScene,
    camera: SharedCamera,
    object: Option<NodeId>,
    mode: GizmoMode,
    space: GizmoSpace,
    enabled: bool,
    snap: SnapSettings,
    size: f32,
    hovered_part: GizmoPart,
    interaction: Option<InteractionState>,
    /// The active drag has written the node at least once
    moved: bool,

    translate_handle: TranslateHandle,
    rotate_handle: RotateHandle,
    scale_handle: ScaleHandle,

    sender: Sender<WidgetEvent>,
    receiver: Receiver<WidgetEvent>,
}

impl TransformWidget {
    pub fn new(scene: SharedScene, camera: SharedCamera) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            scene,
            camera,
            object: None,
            mode: GizmoMode::Translate,
            space: GizmoSpace::World,
            enabled: true,
            snap: SnapSettings::default(),
            size: 1.0,
            hovered_part: GizmoPart::None,
            interaction: None,
            moved: false,
            translate_handle: TranslateHandle::new(),
            rotate_handle: RotateHandle::new(),
            scale_handle: ScaleHandle::new(),
            sender,
            receiver,
        }
    }

    /// Receiver for the widget's notifications.
    pub fn events(&self) -> Receiver<WidgetEvent> {
        self.receiver.clone()
    }

    /// Attach to a node, dropping any previous attachment.
    pub fn attach(&mut self, node: NodeId) {
        if self.object == Some(node) {
            return;
        }
        self.detach();
        if self.scene.borrow().contains(node) {
            self.object = Some(node);
        }
    }

    /// Detach from the current node. An active drag is cancelled.
    pub fn detach(&mut self) {
        self.cancel_drag();
        self.object = None;
        self.hovered_part = GizmoPart::None;
    }

    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    /// Set the gizmo mode. Ignored while dragging.
    pub fn set_mode(&mut self, mode: GizmoMode) {
        if self.interaction.is_none() {
            self.mode = mode;
            self.hovered_part = GizmoPart::None;
        }
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Set the gizmo space. Ignored while dragging.
    pub fn set_space(&mut self, space: GizmoSpace) {
        if self.interaction.is_none() {
            self.space = space;
        }
    }

    pub fn space(&self) -> GizmoSpace {
        self.space
    }

    /// Enable or disable interaction. Disabling cancels an active drag.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cancel_drag();
            self.hovered_part = GizmoPart::None;
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_snap(&mut self, snap: SnapSettings) {
        self.snap = snap;
    }

    pub fn snap(&self) -> SnapSettings {
        self.snap
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size.max(0.01);
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_some()
    }

    pub fn hovered_part(&self) -> GizmoPart {
        self.hovered_part
    }

    fn current_handle(&self) -> &dyn Handle {
        match self.mode {
            GizmoMode::Translate => &self.translate_handle,
            GizmoMode::Rotate => &self.rotate_handle,
            GizmoMode::Scale => &self.scale_handle,
        }
    }

    fn current_handle_mut(&mut self) -> &mut dyn Handle {
        match self.mode {
            GizmoMode::Translate => &mut self.translate_handle,
            GizmoMode::Rotate => &mut self.rotate_handle,
            GizmoMode::Scale => &mut self.scale_handle,
        }
    }

    /// Handle axes in world space. Scale always works in local space.
    fn axes_for(&self, transform: &TransformSnapshot) -> [Vec3; 3] {
        if self.space == GizmoSpace::Local || self.mode == GizmoMode::Scale {
            transform.local_axes()
        } else {
            [Vec3::X, Vec3::Y, Vec3::Z]
        }
    }

    /// Handle size in world units, roughly constant on screen.
    fn handle_scale(&self, transform: &TransformSnapshot) -> f32 {
        let distance = self.camera.borrow().distance_to(transform.position);
        (distance * 0.15).clamp(0.1, 10.0) * self.size
    }

    fn attached_transform(&self) -> Option<(NodeId, TransformSnapshot)> {
        let node = self.object?;
        let transform = self.scene.borrow().transform(node)?;
        Some((node, transform))
    }

    fn emit(&self, event: WidgetEvent) {
        // The widget holds a receiver itself, so the channel never disconnects
        let _ = self.sender.send(event);
    }

    /// Hit test the current handles and update the hovered part.
    pub fn hit_test(&mut self, ray: &Ray) -> GizmoPart {
        let part = match (self.enabled, self.attached_transform()) {
            (true, Some((_, transform))) => {
                let axes = self.axes_for(&transform);
                let scale = self.handle_scale(&transform);
                self.current_handle()
                    .hit_test(&transform, &axes, ray, scale)
                    .map_or(GizmoPart::None, |(part, _)| part)
            }
            _ => GizmoPart::None,
        };
        self.hovered_part = part;
        part
    }

    /// Begin dragging `part` of the current handle set.
    pub fn begin_drag(&mut self, part: GizmoPart, ray: &Ray) -> bool {
        if !self.enabled || self.interaction.is_some() || part.mode() != Some(self.mode) {
            return false;
        }
        let Some((node, transform)) = self.attached_transform() else {
            return false;
        };

        let axes = self.axes_for(&transform);
        let state = self.current_handle_mut().begin_interaction(part, &transform, axes, ray);
        if state.anchor.is_none() {
            // Ray parallel to the drag plane
            return false;
        }

        log::trace!("Gizmo drag started on {} ({:?})", node, part);
        self.hovered_part = part;
        self.interaction = Some(state);
        self.moved = false;
        self.emit(WidgetEvent::DraggingChanged(true));
        true
    }

    /// Update the active drag and write the node transform.
    pub fn drag(&mut self, ray: &Ray) -> bool {
        // Take state out to avoid borrow conflict
        let Some(mut state) = self.interaction.take() else {
            return false;
        };

        let snap = self.snap.step_for(self.mode);
        let delta = self.current_handle_mut().update_interaction(&mut state, ray, snap);
        let next = delta.apply(&state.start);

        // Put state back
        self.interaction = Some(state);

        let Some(node) = self.object else {
            return false;
        };
        if self.scene.borrow_mut().set_transform(node, next) {
            self.moved = true;
            self.emit(WidgetEvent::Change(node, next));
        }
        true
    }

    /// End the active drag, reporting the completed edit.
    pub fn end_drag(&mut self) -> bool {
        let Some(state) = self.interaction.take() else {
            return false;
        };
        if self.moved {
            if let Some((node, transform)) = self.attached_transform() {
                self.emit(WidgetEvent::ObjectChange(node, self.mode, transform));
            }
        }
        log::trace!("Gizmo drag ended ({:?}, moved: {})", state.active_part, self.moved);
        self.moved = false;
        self.emit(WidgetEvent::DraggingChanged(false));
        true
    }

    /// Abort the active drag and restore the node to where it started.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(state) = self.interaction.take() else {
            return false;
        };
        if let Some(node) = self.object {
            if self.moved && self.scene.borrow_mut().set_transform(node, state.start) {
                self.emit(WidgetEvent::Change(node, state.start));
            }
        }
        self.moved = false;
        self.emit(WidgetEvent::DraggingChanged(false));
        true
    }

    fn screen_ray(&self, screen: Vec2) -> Option<Ray> {
        self.camera.borrow().screen_ray(screen)
    }

    /// Pointer pressed in the viewport. Returns true if a handle was grabbed.
    pub fn on_pointer_down(&mut self, button: MouseButton, screen: Vec2) -> bool {
        if button != MouseButton::Left || !self.enabled || self.object.is_none() {
            return false;
        }
        let Some(ray) = self.screen_ray(screen) else {
            return false;
        };
        let part = self.hit_test(&ray);
        part != GizmoPart::None && self.begin_drag(part, &ray)
    }

    /// Pointer moved. Returns true while a drag consumes the motion.
    pub fn on_pointer_move(&mut self, screen: Vec2) -> bool {
        let Some(ray) = self.screen_ray(screen) else {
            return self.is_dragging();
        };
        if self.is_dragging() {
            self.drag(&ray)
        } else {
            self.hit_test(&ray);
            false
        }
    }

    /// Pointer released. Returns true if it ended a drag.
    pub fn on_pointer_up(&mut self, button: MouseButton) -> bool {
        button == MouseButton::Left && self.end_drag()
    }
}
