// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame-range keyframe data attached to nodes.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A single frame-range entry in a keyframe track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    /// First frame this entry covers
    pub start_frame: i32,
    /// Number of frames covered
    pub duration: i32,
    /// Whether the entry is active
    pub visible: bool,
    /// Value for the covered range
    pub value: Value,
}

impl KeyFrame {
    /// Create a visible keyframe covering a frame range
    pub fn new(start_frame: i32, duration: i32, value: Value) -> Self {
        Self {
            start_frame,
            duration,
            visible: true,
            value,
        }
    }

    /// Check if a frame falls inside this entry's range
    pub fn covers(&self, frame: i32) -> bool {
        frame >= self.start_frame && frame < self.start_frame + self.duration
    }
}

/// Sparse keyframe data for one element of a node
///
/// Tracks are keyed by element name on the node; most nodes have none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyFrameTrack {
    /// Entries in insertion order; ranges may be sparse
    pub frames: Vec<KeyFrame>,
}

impl KeyFrameTrack {
    /// Create an empty track
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Add an entry to the track
    pub fn insert(&mut self, frame: KeyFrame) {
        self.frames.push(frame);
    }

    /// The visible entry covering a frame, if any
    pub fn at(&self, frame: i32) -> Option<&KeyFrame> {
        self.frames.iter().find(|k| k.visible && k.covers(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_lookup_respects_range_and_visibility() {
        let mut track = KeyFrameTrack::new();
        track.insert(KeyFrame::new(0, 10, Value::Int(1)));
        let mut hidden = KeyFrame::new(10, 10, Value::Int(2));
        hidden.visible = false;
        track.insert(hidden);

        assert_eq!(track.at(5).map(|k| &k.value), Some(&Value::Int(1)));
        assert_eq!(track.at(10), None);
        assert_eq!(track.at(25), None);
    }
}
