//! Viewport input surface.
//!
//! The host forwards raw pointer, wheel and keyboard events from its window
//! into an [`InputSurface`]. Controllers subscribe handlers per event kind;
//! handlers run in priority order and may stop propagation, which is how the
//! gizmo keeps a handle drag from also orbiting the camera.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;

/// Mouse buttons. Left is the primary button, right the secondary and
/// middle the auxiliary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Keyboard key, normalized to lowercase characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Space,
    Shift,
    Escape,
    Other,
}

impl Key {
    /// Build a character key, folding case.
    pub fn character(c: char) -> Self {
        Key::Character(c.to_ascii_lowercase())
    }
}

/// Raw viewport input. Positions are in viewport pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        button: MouseButton,
        position: Vec2,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Vec2,
        modifiers: Modifiers,
    },
    PointerUp {
        button: MouseButton,
        position: Vec2,
    },
    /// Positive delta scrolls away from the user (zoom out)
    Wheel { delta: f32 },
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key },
    /// Viewport lost keyboard focus; held keys are released
    FocusLost,
}

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        match self {
            InputEvent::PointerDown { .. } => InputKind::PointerDown,
            InputEvent::PointerMove { .. } => InputKind::PointerMove,
            InputEvent::PointerUp { .. } => InputKind::PointerUp,
            InputEvent::Wheel { .. } => InputKind::Wheel,
            InputEvent::KeyDown { .. } => InputKind::KeyDown,
            InputEvent::KeyUp { .. } => InputKind::KeyUp,
            InputEvent::FocusLost => InputKind::FocusLost,
        }
    }
}

/// Event kinds handlers subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    KeyDown,
    KeyUp,
    FocusLost,
}

/// Handler priority. Higher priorities see events first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
}

/// Whether an event continues to lower-priority handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Input handler function type
pub type InputHandler = Box<dyn FnMut(&InputEvent) -> Propagation>;

/// Viewport event source with per-kind, prioritized subscribers.
pub struct InputSurface {
    handlers: BTreeMap<InputKind, Vec<(SubscriberId, Priority, InputHandler)>>,
    next_subscriber_id: u64,
}

pub type SharedInputSurface = Rc<RefCell<InputSurface>>;

impl InputSurface {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            next_subscriber_id: 1,
        }
    }

    /// Subscribe to one event kind
    pub fn subscribe<F>(&mut self, kind: InputKind, priority: Priority, handler: F) -> SubscriberId
    where
        F: FnMut(&InputEvent) -> Propagation + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let handlers = self.handlers.entry(kind).or_default();
        handlers.push((id, priority, Box::new(handler)));
        // Stable: equal priorities keep subscription order
        handlers.sort_by(|a, b| b.1.cmp(&a.1));

        id
    }

    /// Unsubscribe. Returns whether the subscriber existed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut removed = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sub_id, _, _)| *sub_id != id);
            removed |= handlers.len() != before;
        }
        removed
    }

    /// Deliver an event. Returns true if a handler stopped propagation.
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return false;
        };
        for (_, _, handler) in handlers.iter_mut() {
            if handler(event) == Propagation::Stop {
                return true;
            }
        }
        false
    }

    /// Total number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn has_subscribers(&self, kind: InputKind) -> bool {
        self.handlers.get(&kind).is_some_and(|h| !h.is_empty())
    }
}

impl Default for InputSurface {
    fn default() -> Self {
        Self::new()
    }
}
