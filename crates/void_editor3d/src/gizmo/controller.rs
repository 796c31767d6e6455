//! Gizmo controller.
//!
//! Owns the [`TransformWidget`], gates it behind an enabled flag and turns
//! its raw notifications into a typed stream:
//!
//! - [`GizmoEvent::Dragging`] for every live update, mirrored into the
//!   node's [`PendingEdit`] with `dragging: true`
//! - [`GizmoEvent::Committed`] once per finished edit, leaving the pending
//!   edit in place with `dragging: false` for the consumer to take
//!
//! A drag that ends without a commit (cancelled, or released without
//! moving) clears the pending edit.

use std::rc::Rc;

use crossbeam_channel::Receiver;

use crate::config::{GizmoSettings, SnapSettings};
use crate::input::{
    InputEvent, InputKind, Priority, Propagation, SharedInputSurface, SubscriberId,
};
use crate::scene::{NodeId, PendingEdit, SharedCamera, SharedScene, TransformSnapshot};
use crate::widget::{GizmoMode, GizmoSpace, TransformWidget, WidgetEvent};
use crate::{shared, Shared};

/// Typed gizmo edit stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GizmoEvent {
    /// Live transform while a handle is dragged
    Dragging {
        node: NodeId,
        snapshot: TransformSnapshot,
    },
    /// Final transform of a completed edit
    Committed {
        node: NodeId,
        mode: GizmoMode,
        snapshot: TransformSnapshot,
    },
}

/// Controller for the transform gizmo.
pub struct GizmoController {
    widget: Shared<TransformWidget>,
    scene: SharedScene,
    notifications: Receiver<WidgetEvent>,
    enabled: bool,
    /// Node with an uncommitted pending edit
    live_node: Option<NodeId>,
    surface: Option<SharedInputSurface>,
    subscriptions: Vec<SubscriberId>,
}

impl GizmoController {
    pub fn new(scene: SharedScene, camera: SharedCamera, settings: &GizmoSettings) -> Self {
        let mut widget = TransformWidget::new(Rc::clone(&scene), camera);
        widget.set_mode(settings.mode);
        widget.set_space(settings.space);
        widget.set_snap(settings.snap);
        widget.set_size(settings.size);
        widget.set_enabled(settings.enabled);
        let notifications = widget.events();

        Self {
            widget: shared(widget),
            scene,
            notifications,
            enabled: settings.enabled,
            live_node: None,
            surface: None,
            subscriptions: Vec::new(),
        }
    }

    /// Route viewport pointer input to the widget ahead of camera handlers.
    /// Events that grab, drag or release a handle stop propagating.
    pub fn connect(&mut self, surface: SharedInputSurface) {
        self.disconnect();
        {
            let mut input = surface.borrow_mut();
            for kind in [InputKind::PointerDown, InputKind::PointerMove, InputKind::PointerUp] {
                let widget = Rc::clone(&self.widget);
                let id = input.subscribe(kind, Priority::High, move |event| {
                    let mut widget = widget.borrow_mut();
                    let consumed = match *event {
                        InputEvent::PointerDown { button, position, .. } => {
                            widget.on_pointer_down(button, position)
                        }
                        InputEvent::PointerMove { position, .. } => widget.on_pointer_move(position),
                        InputEvent::PointerUp { button, .. } => widget.on_pointer_up(button),
                        _ => false,
                    };
                    if consumed {
                        Propagation::Stop
                    } else {
                        Propagation::Continue
                    }
                });
                self.subscriptions.push(id);
            }
        }
        self.surface = Some(surface);
    }

    /// Remove the pointer handlers installed by [`connect`](Self::connect).
    pub fn disconnect(&mut self) {
        let Some(surface) = self.surface.take() else {
            return;
        };
        let mut input = surface.borrow_mut();
        for id in self.subscriptions.drain(..) {
            input.unsubscribe(id);
        }
    }

    /// Detach the current node and attach `node` if enabled.
    pub fn set_object(&mut self, node: Option<NodeId>) {
        let mut widget = self.widget.borrow_mut();
        widget.detach();
        if let (true, Some(node)) = (self.enabled, node) {
            widget.attach(node);
        }
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.widget.borrow().object()
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.widget.borrow_mut().set_mode(mode);
    }

    pub fn current_mode(&self) -> GizmoMode {
        self.widget.borrow().mode()
    }

    /// Switch between local and world space.
    pub fn toggle_space(&mut self) {
        let mut widget = self.widget.borrow_mut();
        let space = widget.space().toggled();
        widget.set_space(space);
    }

    pub fn set_space(&mut self, space: GizmoSpace) {
        self.widget.borrow_mut().set_space(space);
    }

    pub fn current_space(&self) -> GizmoSpace {
        self.widget.borrow().space()
    }

    /// Enable or disable the gizmo. Disabling detaches.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        let mut widget = self.widget.borrow_mut();
        widget.set_enabled(enabled);
        if !enabled {
            widget.detach();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.widget.borrow().is_dragging()
    }

    pub fn set_snap(&mut self, snap: SnapSettings) {
        self.widget.borrow_mut().set_snap(snap);
    }

    /// Direct access to the widget, e.g. for ray-driven drags.
    pub fn widget(&self) -> &Shared<TransformWidget> {
        &self.widget
    }

    /// Drain widget notifications into typed events.
    pub fn poll_events(&mut self) -> Vec<GizmoEvent> {
        let mut events = Vec::new();
        let notifications: Vec<WidgetEvent> = self.notifications.try_iter().collect();
        let mut scene = self.scene.borrow_mut();

        for notification in notifications {
            match notification {
                WidgetEvent::Change(node, snapshot) => {
                    if !scene.set_pending_edit(node, Some(PendingEdit { dragging: true, snapshot })) {
                        continue;
                    }
                    self.live_node = Some(node);
                    events.push(GizmoEvent::Dragging { node, snapshot });
                }
                WidgetEvent::ObjectChange(node, mode, snapshot) => {
                    if !scene.set_pending_edit(node, Some(PendingEdit { dragging: false, snapshot })) {
                        continue;
                    }
                    self.live_node = None;
                    log::debug!("Gizmo {} committed on {}", mode.label(), node);
                    events.push(GizmoEvent::Committed { node, mode, snapshot });
                }
                WidgetEvent::DraggingChanged(true) => {}
                WidgetEvent::DraggingChanged(false) => {
                    // Ended without a commit
                    if let Some(node) = self.live_node.take() {
                        scene.set_pending_edit(node, None);
                    }
                }
            }
        }

        events
    }

    /// Disconnect input and detach.
    pub fn dispose(&mut self) {
        self.disconnect();
        self.widget.borrow_mut().detach();
        // Drop whatever the detach produced
        self.poll_events();
        log::debug!("Gizmo controller disposed");
    }
}
