// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change-based mutation and undo engine for Mural node graphs.
//!
//! Every mutation of a [`Document`] goes through a [`Change`]: a command
//! object that validates its preconditions against the live document,
//! applies, and can revert to the exact prior state. The
//! [`DocumentChangeTracker`] owns the undo/redo stacks, drives continuous
//! gestures through [`UpdateableChange`], and merges consecutive
//! same-target changes into single undo entries.
//!
//! Observers never re-scan the graph; they consume the ordered
//! [`ChangeInfo`] stream each change returns.

pub mod change;
pub mod change_info;
pub mod changes;
pub mod document;
pub mod tracker;

pub use change::{Applied, Change, ChangeResult, UpdateableChange};
pub use change_info::ChangeInfo;
pub use document::{Document, DocumentError};
pub use tracker::{DocumentChangeTracker, TrackerError};
