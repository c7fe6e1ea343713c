// SPDX-License-Identifier: MIT OR Apache-2.0
//! The change lifecycle: validate, apply, revert.
//!
//! A change moves through created → validated → applied ⇄ reverted →
//! dropped. Validation failure is the only sanctioned failure path and is
//! a silent no-op: the change is discarded before any mutation. Once
//! validated, apply and revert must succeed; a failure past that point is
//! a contract violation and panics. Snapshot resources release through
//! `Drop` whether or not the change was ever applied.

use crate::change_info::ChangeInfo;
use crate::document::Document;
use std::any::Any;

/// Tagged result of applying or reverting a change
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeResult {
    /// No observable effect
    None,
    /// A single effect
    One(ChangeInfo),
    /// Ordered effects; later entries may reference entities created by
    /// earlier ones
    Many(Vec<ChangeInfo>),
}

impl ChangeResult {
    /// Collapse a list into the smallest fitting variant
    pub fn from_vec(mut infos: Vec<ChangeInfo>) -> Self {
        match infos.len() {
            0 => Self::None,
            1 => Self::One(infos.remove(0)),
            _ => Self::Many(infos),
        }
    }

    /// Flatten into an ordered info list
    pub fn into_infos(self) -> Vec<ChangeInfo> {
        match self {
            Self::None => Vec::new(),
            Self::One(info) => vec![info],
            Self::Many(infos) => infos,
        }
    }
}

/// Outcome of [`Change::apply`]
#[derive(Debug)]
pub struct Applied {
    /// Observable effects, in order
    pub info: ChangeResult,
    /// Opts the change out of the undo stack (e.g. pure evaluation)
    pub ignore_in_undo: bool,
}

impl Applied {
    /// An undoable outcome
    pub fn undoable(info: ChangeResult) -> Self {
        Self {
            info,
            ignore_in_undo: false,
        }
    }

    /// An outcome that never enters the undo stack
    pub fn ignored(info: ChangeResult) -> Self {
        Self {
            info,
            ignore_in_undo: true,
        }
    }
}

/// A command object encapsulating one graph mutation
pub trait Change: Any {
    /// Human-readable description for undo UI and logs
    fn description(&self) -> &str;

    /// Pure precondition check that also captures the before-state revert
    /// will restore
    ///
    /// Must not mutate the document. Returning `false` aborts the
    /// operation entirely; `apply` must not be called afterwards.
    fn initialize_and_validate(&mut self, target: &Document) -> bool;

    /// Mutate the document
    ///
    /// `first_apply` distinguishes the initial apply from a redo replay,
    /// letting a change skip one-time setup on redo.
    fn apply(&mut self, target: &mut Document, first_apply: bool) -> Applied;

    /// Restore the exact pre-apply state from data captured during
    /// validation or the first apply
    ///
    /// Called under strict stack discipline: apply and revert alternate
    /// per undo entry, never arbitrary replay.
    fn revert(&mut self, target: &mut Document) -> ChangeResult;

    /// Whether a later change may fold into the same undo entry
    fn is_mergeable_with(&self, _other: &dyn Change) -> bool {
        false
    }

    /// Downcast support for merge checks
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support for gesture updates
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A change supporting in-place updates during a continuous gesture
///
/// The host applies it temporarily each gesture frame without touching
/// the undo stack, then commits once through [`Change::apply`] at gesture
/// end.
pub trait UpdateableChange: Change {
    /// Apply the current parameters without undo bookkeeping
    fn apply_temporarily(&mut self, target: &mut Document) -> ChangeResult;
}
