//! Undo/redo history of instance transform edits.

use crate::instance::{InstanceId, InstanceStore, InstanceTransform};
use crate::sync::{TransformCompleted, TransformKind};

/// A completed edit with enough state to reverse it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformEdit {
    pub instance: InstanceId,
    pub kind: TransformKind,
    pub before: InstanceTransform,
    pub after: InstanceTransform,
}

impl TransformEdit {
    pub fn description(&self) -> &'static str {
        match self.kind {
            TransformKind::Translate => "Move instance",
            TransformKind::Rotate => "Rotate instance",
            TransformKind::Scale => "Resize instance",
        }
    }
}

impl From<TransformCompleted> for TransformEdit {
    fn from(completed: TransformCompleted) -> Self {
        Self {
            instance: completed.instance,
            kind: completed.kind,
            before: completed.before,
            after: completed.after,
        }
    }
}

/// Undo/redo stacks.
pub struct EditHistory {
    /// Edits that can be undone
    undo_stack: Vec<TransformEdit>,
    /// Edits that can be redone
    redo_stack: Vec<TransformEdit>,
    /// Maximum history size
    max_size: usize,
    /// Whether history has been modified since last save
    dirty: bool,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub const DEFAULT_MAX_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            dirty: false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.last().map(TransformEdit::description)
    }

    pub fn redo_description(&self) -> Option<&'static str> {
        self.redo_stack.last().map(TransformEdit::description)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Record an edit that has already been applied.
    pub fn record(&mut self, edit: TransformEdit) {
        if edit.before == edit.after {
            return;
        }
        self.undo_stack.push(edit);
        self.redo_stack.clear();
        self.dirty = true;

        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last edit. Returns the instance it touched.
    ///
    /// An edit whose instance no longer exists is dropped.
    pub fn undo(&mut self, store: &mut InstanceStore) -> Option<InstanceId> {
        let edit = self.undo_stack.pop()?;
        let Some(instance) = store.get_mut(edit.instance) else {
            log::warn!("Undo skipped: {} no longer exists", edit.instance);
            return None;
        };
        instance.apply_transform(&edit.before);
        log::debug!("Undo: {}", edit.description());
        self.redo_stack.push(edit);
        self.dirty = true;
        Some(edit.instance)
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self, store: &mut InstanceStore) -> Option<InstanceId> {
        let edit = self.redo_stack.pop()?;
        let Some(instance) = store.get_mut(edit.instance) else {
            log::warn!("Redo skipped: {} no longer exists", edit.instance);
            return None;
        };
        instance.apply_transform(&edit.after);
        log::debug!("Redo: {}", edit.description());
        self.undo_stack.push(edit);
        self.dirty = true;
        Some(edit.instance)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
