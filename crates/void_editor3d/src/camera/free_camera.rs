//! Damped orbit/pan/zoom camera with optional keyboard flight.
//!
//! Input handlers only move the *target* spherical state and the pivot.
//! [`FreeCameraController::update`] then moves the current state a fixed
//! fraction of the way toward the target and re-aims the camera.

use std::rc::Rc;

use glam::{Vec2, Vec3};

use super::spherical::Spherical;
use crate::config::CameraSettings;
use crate::input::{
    InputEvent, InputKind, Key, MouseButton, Priority, Propagation, SharedInputSurface,
    SubscriberId,
};
use crate::scene::SharedCamera;
use crate::{shared, Shared};

const INPUT_KINDS: [InputKind; 7] = [
    InputKind::PointerDown,
    InputKind::PointerMove,
    InputKind::PointerUp,
    InputKind::Wheel,
    InputKind::KeyDown,
    InputKind::KeyUp,
    InputKind::FocusLost,
];

/// Pixels of auxiliary-button drag per wheel unit of zoom.
const PIXELS_PER_ZOOM_STEP: f32 = 100.0;

/// Movement keys currently held.
#[derive(Clone, Copy, Debug, Default)]
struct HeldKeys {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl HeldKeys {
    /// Movement direction as (forward, right, up) in -1..=1.
    fn axes(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vec3::new(
            axis(self.forward, self.back),
            axis(self.right, self.left),
            axis(self.up, self.down),
        )
    }

    fn set(&mut self, key: Key, held: bool) -> bool {
        let slot = match key {
            Key::Character('w') => &mut self.forward,
            Key::Character('s') => &mut self.back,
            Key::Character('a') => &mut self.left,
            Key::Character('d') => &mut self.right,
            Key::Character('e') | Key::Space => &mut self.up,
            Key::Character('q') | Key::Shift => &mut self.down,
            _ => return false,
        };
        *slot = held;
        true
    }
}

#[derive(Clone, Copy, Debug)]
struct PointerDrag {
    button: MouseButton,
    last: Vec2,
}

/// Rig state shared between the controller and its input handlers.
struct CameraRig {
    camera: SharedCamera,
    settings: CameraSettings,
    current: Spherical,
    target: Spherical,
    /// Point the camera orbits and looks at
    pivot: Vec3,
    drag: Option<PointerDrag>,
    keys: HeldKeys,
}

impl CameraRig {
    fn new(camera: SharedCamera, settings: CameraSettings) -> Self {
        let mut rig = Self {
            camera,
            settings,
            current: Spherical::default(),
            target: Spherical::default(),
            pivot: Vec3::ZERO,
            drag: None,
            keys: HeldKeys::default(),
        };
        rig.sync_from_camera();
        rig
    }

    /// Re-derive pivot and spherical state from the camera pose.
    fn sync_from_camera(&mut self) {
        let (position, target) = {
            let camera = self.camera.borrow();
            (camera.position, camera.target)
        };
        self.pivot = target;
        self.current = Spherical::from_offset(position - target);
        self.clamp_spherical();
        self.target = self.current;
    }

    fn polar_range(&self) -> (f32, f32) {
        (self.settings.min_polar_angle, self.settings.max_polar_angle)
    }

    fn distance_range(&self) -> (f32, f32) {
        (self.settings.min_distance, self.settings.max_distance)
    }

    fn clamp_spherical(&mut self) {
        let (polar, distance) = (self.polar_range(), self.distance_range());
        self.current.clamp(polar, distance);
    }

    fn clamp_target(&mut self) {
        let (polar, distance) = (self.polar_range(), self.distance_range());
        self.target.clamp(polar, distance);
    }

    fn orbit(&mut self, delta: Vec2) {
        self.target.theta -= delta.x * self.settings.rotate_speed;
        self.target.phi -= delta.y * self.settings.rotate_speed;
        self.clamp_target();
    }

    fn pan(&mut self, delta: Vec2) {
        let (right, up) = {
            let camera = self.camera.borrow();
            (camera.right(), camera.up_vector())
        };
        self.pivot += (-right * delta.x + up * delta.y) * self.settings.pan_speed;
    }

    /// Scale the target radius by `1 + amount * zoom_speed`.
    fn zoom(&mut self, amount: f32) {
        let factor = (1.0 + amount * self.settings.zoom_speed).max(0.05);
        self.target.radius *= factor;
        self.clamp_target();
    }

    fn release_all(&mut self) {
        self.drag = None;
        self.keys = HeldKeys::default();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { button, position, .. } => {
                self.drag = Some(PointerDrag { button, last: position });
            }
            InputEvent::PointerMove { position, .. } => {
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                let delta = position - drag.last;
                let button = drag.button;
                drag.last = position;
                match button {
                    MouseButton::Left => self.orbit(delta),
                    MouseButton::Right => self.pan(delta),
                    MouseButton::Middle => self.zoom(delta.y / PIXELS_PER_ZOOM_STEP),
                }
            }
            InputEvent::PointerUp { button, .. } => {
                if self.drag.is_some_and(|drag| drag.button == button) {
                    self.drag = None;
                }
            }
            InputEvent::Wheel { delta } => {
                if delta != 0.0 {
                    self.zoom(delta.signum());
                }
            }
            InputEvent::KeyDown { key, modifiers } => {
                if self.settings.keyboard_enabled && !modifiers.ctrl && !modifiers.alt {
                    self.keys.set(key, true);
                }
            }
            InputEvent::KeyUp { key } => {
                self.keys.set(key, false);
            }
            InputEvent::FocusLost => self.release_all(),
        }
    }

    fn update(&mut self) {
        if self.settings.keyboard_enabled {
            let axes = self.keys.axes();
            if axes != Vec3::ZERO {
                let (forward, right) = {
                    let camera = self.camera.borrow();
                    (camera.forward(), camera.right())
                };
                self.pivot += (forward * axes.x + right * axes.y + Vec3::Y * axes.z) * self.settings.move_speed;
            }
        }

        let damping = self.settings.damping_factor;
        self.current.step_toward(&self.target, damping);

        let mut camera = self.camera.borrow_mut();
        camera.position = self.pivot + self.current.to_offset();
        camera.look_at(self.pivot);
    }
}

/// Orbit-style viewport camera controller.
pub struct FreeCameraController {
    rig: Shared<CameraRig>,
    surface: SharedInputSurface,
    subscriptions: Vec<SubscriberId>,
}

impl FreeCameraController {
    /// Create a disabled controller around the camera's current pose.
    pub fn new(camera: SharedCamera, surface: SharedInputSurface, settings: CameraSettings) -> Self {
        Self {
            rig: shared(CameraRig::new(camera, settings)),
            surface,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe input handlers. Does nothing if already enabled.
    pub fn enable(&mut self) {
        if self.is_enabled() {
            return;
        }
        let mut surface = self.surface.borrow_mut();
        for kind in INPUT_KINDS {
            let rig = Rc::clone(&self.rig);
            let id = surface.subscribe(kind, Priority::Normal, move |event| {
                rig.borrow_mut().handle_input(event);
                Propagation::Continue
            });
            self.subscriptions.push(id);
        }
        log::debug!("Free camera enabled");
    }

    /// Unsubscribe every handler and drop held input. Does nothing if disabled.
    pub fn disable(&mut self) {
        if !self.is_enabled() {
            return;
        }
        let mut surface = self.surface.borrow_mut();
        for id in self.subscriptions.drain(..) {
            surface.unsubscribe(id);
        }
        self.rig.borrow_mut().release_all();
        log::debug!("Free camera disabled");
    }

    pub fn is_enabled(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Advance the damped state by one frame.
    pub fn update(&mut self) {
        if self.is_enabled() {
            self.rig.borrow_mut().update();
        }
    }

    /// Move the pivot.
    pub fn set_target(&mut self, target: Vec3) {
        self.rig.borrow_mut().pivot = target;
    }

    /// Move the pivot to `point`, optionally changing the target distance.
    pub fn focus_on(&mut self, point: Vec3, distance: Option<f32>) {
        let mut rig = self.rig.borrow_mut();
        rig.pivot = point;
        if let Some(distance) = distance {
            rig.target.radius = distance;
            rig.clamp_target();
        }
    }

    pub fn pan_target(&self) -> Vec3 {
        self.rig.borrow().pivot
    }

    pub fn current_spherical(&self) -> Spherical {
        self.rig.borrow().current
    }

    pub fn target_spherical(&self) -> Spherical {
        self.rig.borrow().target
    }

    pub fn damping_factor(&self) -> f32 {
        self.rig.borrow().settings.damping_factor
    }

    pub fn set_damping_factor(&mut self, factor: f32) {
        if factor.is_nan() {
            return;
        }
        self.rig.borrow_mut().settings.damping_factor = factor.clamp(0.01, 1.0);
    }

    pub fn settings(&self) -> CameraSettings {
        self.rig.borrow().settings.clone()
    }

    /// Re-read the camera pose, e.g. after the host moved the camera.
    pub fn reset(&mut self) {
        let mut rig = self.rig.borrow_mut();
        rig.release_all();
        rig.sync_from_camera();
    }

    pub fn dispose(&mut self) {
        self.disable();
    }
}
