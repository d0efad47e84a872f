//! Tracked object identity and its per-frame history.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::tracker::matching::{Label, Mask};
use crate::tracker::quad::Quad;

/// Unique instance identifier. Positive, never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source owned by an `InstanceStore`.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the next unique instance ID, starting at 1.
    pub fn next_id(&mut self) -> InstanceId {
        self.last += 1;
        InstanceId(self.last)
    }
}

/// One frame of an instance's history. Immutable once created.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub frame_number: u32,
    pub mask: Mask,
    pub axis_bbox: Quad,
    pub rotated_bbox: Quad,
}

impl FrameRecord {
    pub fn new(frame_number: u32, mask: Mask, axis_bbox: Quad, rotated_bbox: Quad) -> Self {
        Self {
            frame_number,
            mask,
            axis_bbox,
            rotated_bbox,
        }
    }
}

/// One tracked object over time.
///
/// Always holds at least one frame; frame numbers are strictly increasing.
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: InstanceId,
    pub label: Label,
    frames: Vec<FrameRecord>,
}

impl Instance {
    /// Create an instance together with its first frame.
    pub fn new(id: InstanceId, label: Label, first: FrameRecord) -> Self {
        Self {
            id,
            label,
            frames: vec![first],
        }
    }

    pub(crate) fn push(&mut self, record: FrameRecord) {
        debug_assert!(
            record.frame_number > self.last_frame_number(),
            "instance {} got frame {} after {}",
            self.id,
            record.frame_number,
            self.last_frame_number()
        );
        self.frames.push(record);
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first_frame_number(&self) -> u32 {
        self.frames[0].frame_number
    }

    pub fn last_frame_number(&self) -> u32 {
        self.frames[self.frames.len() - 1].frame_number
    }

    pub fn has_frame(&self, frame_number: u32) -> bool {
        self.frames
            .binary_search_by_key(&frame_number, |f| f.frame_number)
            .is_ok()
    }

    /// Record at `frame_number`, or `MissingFrame` if the instance was not
    /// seen in that frame.
    pub fn frame(&self, frame_number: u32) -> Result<&FrameRecord> {
        self.frames
            .binary_search_by_key(&frame_number, |f| f.frame_number)
            .map(|i| &self.frames[i])
            .map_err(|_| TrackError::MissingFrame {
                id: self.id,
                frame_number,
            })
    }
}
