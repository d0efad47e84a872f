//! Error types for tracking and tube extraction.

use thiserror::Error;

use crate::tracker::InstanceId;

/// Fatal tracking errors. Any of these aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// An unknown instance was appended to without a label to create it with.
    #[error("cannot create instance {id} without a label")]
    InvalidAppend { id: InstanceId },

    /// An instance was queried for a frame it was never recorded in.
    #[error("instance {id} has no record for frame {frame_number}")]
    MissingFrame { id: InstanceId, frame_number: u32 },

    /// Two masks that must be compared pixel by pixel differ in shape.
    #[error("mask shape mismatch: expected {expected:?}, found {found:?}")]
    MaskShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Frames must be fed in strictly increasing order.
    #[error("frame {found} processed after frame {last}")]
    FrameOutOfOrder { last: u32, found: u32 },

    /// A detection was built without one of its required parts.
    #[error("incomplete detection: missing {0}")]
    IncompleteDetection(&'static str),
}

pub type Result<T> = std::result::Result<T, TrackError>;
