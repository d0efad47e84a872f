//! Matching utilities for mask-based instance tracking.
//!
//! Scoring is a raw intersection count: the number of pixels that are
//! foreground in both masks, not normalized by union or area.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{Result, TrackError};
use crate::tracker::instance::{Instance, InstanceId};
use crate::tracker::quad::Quad;

/// Binary instance mask, shape `(height, width)`. Nonzero is foreground.
pub type Mask = Array2<u8>;

/// Label name, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(Arc<str>);

impl Label {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Detection input for the tracker.
#[derive(Debug, Clone)]
pub struct Detection {
    pub label: Label,
    /// Filled instance mask, same dimensions as the frame
    pub mask: Mask,
    /// Axis-aligned bounding box
    pub axis_bbox: Quad,
    /// Minimum-area rotated bounding box
    pub rotated_bbox: Quad,
}

impl Detection {
    pub fn new(label: Label, mask: Mask, axis_bbox: Quad, rotated_bbox: Quad) -> Self {
        Self {
            label,
            mask,
            axis_bbox,
            rotated_bbox,
        }
    }
}

/// Count pixels that are foreground in both masks.
pub fn intersection_count(a: ArrayView2<u8>, b: ArrayView2<u8>) -> Result<u64> {
    if a.dim() != b.dim() {
        return Err(TrackError::MaskShapeMismatch {
            expected: a.dim(),
            found: b.dim(),
        });
    }
    Ok(Zip::from(a).and(b).fold(0u64, |acc, &pa, &pb| {
        acc + u64::from(pa != 0 && pb != 0)
    }))
}

/// Best-scoring candidate for one detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: InstanceId,
    pub score: u64,
}

/// Score `mask` against every candidate's record at `prev_frame` and return
/// the highest scorer.
///
/// Ties keep the earliest candidate in `candidates` order. Returns `None` when
/// there are no candidates.
pub fn best_candidate(
    mask: ArrayView2<u8>,
    candidates: &[&Instance],
    prev_frame: u32,
) -> Result<Option<Candidate>> {
    let mut best: Option<Candidate> = None;
    for inst in candidates {
        let record = inst.frame(prev_frame)?;
        let score = intersection_count(mask, record.mask.view())?;
        if best.is_none_or(|b| score > b.score) {
            best = Some(Candidate { id: inst.id, score });
        }
    }
    Ok(best)
}

/// Outcome of the continue-or-spawn decision for one detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Continue an identity seen in the previous frame
    Continue(InstanceId),
    /// Allocate a fresh identity
    Spawn,
}

/// Decide whether the best candidate may be continued.
///
/// A candidate is continued only if it overlaps at all and no earlier
/// detection of this frame has already claimed it.
pub fn assign(best: Option<Candidate>, claimed: &[InstanceId]) -> Assignment {
    match best {
        Some(c) if c.score > 0 && !claimed.contains(&c.id) => Assignment::Continue(c.id),
        _ => Assignment::Spawn,
    }
}
