// SPDX-License-Identifier: MIT OR Apache-2.0
//! The change tracker: undo/redo stacks and gesture handling.
//!
//! The tracker is the single logical owner of all document mutation.
//! Changes arrive one at a time, validate against the live document, and
//! either apply-and-record or silently disappear. Undo entries are
//! *packets* of changes reverted together; a packet holding exactly one
//! change may merge into the previous homologous packet, so a burst of
//! position nudges costs one undo step.

use crate::change::{Change, ChangeResult, UpdateableChange};
use crate::change_info::ChangeInfo;
use crate::document::Document;
use tracing::{debug, warn};

/// Error from tracker operations
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Nothing to undo
    #[error("nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("nothing to redo")]
    NothingToRedo,

    /// An updateable change gesture is still active
    #[error("an updateable change is still active")]
    GestureActive,

    /// No gesture is active
    #[error("no updateable change is active")]
    NoActiveGesture,

    /// An undo packet is still open
    #[error("an undo packet is still open")]
    PacketOpen,
}

type ChangePacket = Vec<Box<dyn Change>>;

/// Undo/redo host driving the change lifecycle against one document
pub struct DocumentChangeTracker {
    document: Document,
    active_change: Option<Box<dyn UpdateableChange>>,
    active_packet: Option<ChangePacket>,
    undo_stack: Vec<ChangePacket>,
    redo_stack: Vec<ChangePacket>,
}

impl DocumentChangeTracker {
    /// Create a tracker around a fresh document
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Create a tracker around an existing document
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            active_change: None,
            active_packet: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Read access to the tracked document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Validate and apply one change
    ///
    /// A change failing validation is discarded without effect; that is
    /// the sanctioned failure path, not an error. Changes applying with
    /// `ignore_in_undo` are dropped after their effect.
    pub fn apply_change(&mut self, mut change: Box<dyn Change>) -> Result<ChangeResult, TrackerError> {
        if self.active_change.is_some() {
            return Err(TrackerError::GestureActive);
        }
        if !change.initialize_and_validate(&self.document) {
            warn!(change = change.description(), "change failed validation, discarded");
            return Ok(ChangeResult::None);
        }
        let applied = change.apply(&mut self.document, true);
        debug!(change = change.description(), ignored = applied.ignore_in_undo, "change applied");
        if !applied.ignore_in_undo {
            self.add_to_undo(change);
        }
        Ok(applied.info)
    }

    /// Validate and apply one change, boxing for the caller
    pub fn apply<C: Change + 'static>(&mut self, change: C) -> Result<ChangeResult, TrackerError> {
        self.apply_change(Box::new(change))
    }

    /// Begin a continuous gesture
    ///
    /// The change applies temporarily; nothing reaches the undo stack
    /// until [`DocumentChangeTracker::end_gesture`].
    pub fn start_gesture(
        &mut self,
        mut change: Box<dyn UpdateableChange>,
    ) -> Result<ChangeResult, TrackerError> {
        if self.active_change.is_some() {
            return Err(TrackerError::GestureActive);
        }
        if !change.initialize_and_validate(&self.document) {
            warn!(change = change.description(), "gesture failed validation, discarded");
            return Ok(ChangeResult::None);
        }
        let info = change.apply_temporarily(&mut self.document);
        self.active_change = Some(change);
        Ok(info)
    }

    /// Update the active gesture's parameters and re-apply temporarily
    ///
    /// The closure downcasts to the concrete change to feed it new
    /// parameters.
    pub fn update_gesture(
        &mut self,
        update: impl FnOnce(&mut dyn UpdateableChange),
    ) -> Result<ChangeResult, TrackerError> {
        let change = self
            .active_change
            .as_mut()
            .ok_or(TrackerError::NoActiveGesture)?;
        update(change.as_mut());
        Ok(change.apply_temporarily(&mut self.document))
    }

    /// Commit the active gesture as one real apply
    pub fn end_gesture(&mut self) -> Result<ChangeResult, TrackerError> {
        let mut change = self
            .active_change
            .take()
            .ok_or(TrackerError::NoActiveGesture)?;
        let applied = change.apply(&mut self.document, true);
        debug!(change = change.description(), "gesture committed");
        if !applied.ignore_in_undo {
            self.add_to_undo(change);
        }
        Ok(applied.info)
    }

    fn add_to_undo(&mut self, change: Box<dyn Change>) {
        self.active_packet.get_or_insert_with(Vec::new).push(change);
        // New history invalidates everything redoable
        self.redo_stack.clear();
    }

    /// Close the open packet, merging with the previous entry when the
    /// packet is a single change mergeable into it
    pub fn complete_packet(&mut self) {
        let Some(packet) = self.active_packet.take() else {
            return;
        };
        if packet.len() == 1 {
            if let Some(previous) = self.undo_stack.last_mut() {
                let homologous = Self::is_homologous(previous);
                if homologous
                    && previous
                        .last()
                        .is_some_and(|last| last.is_mergeable_with(packet[0].as_ref()))
                {
                    previous.extend(packet);
                    return;
                }
            }
        }
        self.undo_stack.push(packet);
    }

    fn is_homologous(packet: &ChangePacket) -> bool {
        packet
            .windows(2)
            .all(|pair| pair[1].is_mergeable_with(pair[0].as_ref()))
    }

    /// Revert the newest undo entry
    ///
    /// The packet reverts in reverse apply order and moves to the redo
    /// stack. The ordered infos describe the rollback.
    pub fn undo(&mut self) -> Result<Vec<ChangeInfo>, TrackerError> {
        self.ensure_quiescent()?;
        let mut packet = self.undo_stack.pop().ok_or(TrackerError::NothingToUndo)?;
        let mut infos = Vec::new();
        for change in packet.iter_mut().rev() {
            debug!(change = change.description(), "reverting");
            infos.extend(change.revert(&mut self.document).into_infos());
        }
        self.redo_stack.push(packet);
        Ok(infos)
    }

    /// Re-apply the newest redo entry
    pub fn redo(&mut self) -> Result<Vec<ChangeInfo>, TrackerError> {
        self.ensure_quiescent()?;
        let mut packet = self.redo_stack.pop().ok_or(TrackerError::NothingToRedo)?;
        let mut infos = Vec::new();
        for change in packet.iter_mut() {
            debug!(change = change.description(), "re-applying");
            infos.extend(change.apply(&mut self.document, false).info.into_infos());
        }
        self.undo_stack.push(packet);
        Ok(infos)
    }

    fn ensure_quiescent(&self) -> Result<(), TrackerError> {
        if self.active_change.is_some() {
            return Err(TrackerError::GestureActive);
        }
        if self.active_packet.is_some() {
            return Err(TrackerError::PacketOpen);
        }
        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the next undo entry
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|packet| packet.last())
            .map(|change| change.description())
    }

    /// Description of the next redo entry
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|packet| packet.last())
            .map(|change| change.description())
    }

    /// Drop all recorded history, releasing every snapshot
    pub fn clear_history(&mut self) -> Result<(), TrackerError> {
        self.ensure_quiescent()?;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }
}

impl Default for DocumentChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}
