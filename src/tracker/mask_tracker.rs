//! Frame-by-frame mask tracker.
//!
//! Each detection is matched greedily against the previous frame's live
//! instances of the same label. Earlier detections have first claim on an
//! identity: a later detection whose best match was already claimed in this
//! frame spawns a new identity, even if its own score was higher. There is no
//! global reassignment, so the outcome depends on detection order.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::{Result, TrackError};
use crate::tracker::instance::{FrameRecord, Instance, InstanceId};
use crate::tracker::instance_store::{Annotation, InstanceStore};
use crate::tracker::matching::{self, Assignment, Candidate, Detection};

/// Result of processing one frame.
#[derive(Debug)]
pub struct FrameUpdate {
    pub frame_number: u32,
    /// Identity committed for each detection, in input order
    pub assigned: Vec<InstanceId>,
    /// Instances that lapsed in this frame, removed from the store
    pub evicted: Vec<Instance>,
}

#[derive(Debug, Default)]
pub struct MaskTracker {
    store: InstanceStore,
    last_frame: Option<u32>,
    parallel_scoring: bool,
}

impl MaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score detections on the rayon pool. Commits stay sequential.
    pub fn with_parallel_scoring(mut self, enabled: bool) -> Self {
        self.parallel_scoring = enabled;
        self
    }

    /// Track one frame.
    ///
    /// `detections` must already be in commit order: label order, then the
    /// detection source's order within a label.
    pub fn update(&mut self, frame_number: u32, detections: Vec<Detection>) -> Result<FrameUpdate> {
        if let Some(last) = self.last_frame {
            if frame_number <= last {
                return Err(TrackError::FrameOutOfOrder {
                    last,
                    found: frame_number,
                });
            }
        }
        self.last_frame = Some(frame_number);

        // Step 1: score every detection against the previous frame. Commits
        // below only add records at `frame_number`, so the candidate pools
        // cannot change between detections.
        let prev_frame = frame_number.checked_sub(1);
        let best: Vec<Option<Candidate>> = if self.parallel_scoring {
            detections
                .par_iter()
                .map(|d| self.score(d, prev_frame))
                .collect::<Result<_>>()?
        } else {
            detections
                .iter()
                .map(|d| self.score(d, prev_frame))
                .collect::<Result<_>>()?
        };

        // Step 2: commit in order, first claim wins
        let mut assigned = Vec::with_capacity(detections.len());
        for (det, best) in detections.into_iter().zip(best) {
            let claimed = self.store.get_instance_ids_in_frame(frame_number);
            let id = match matching::assign(best, &claimed) {
                Assignment::Continue(id) => id,
                Assignment::Spawn => self.store.get_unused_instance_id(),
            };
            trace!(
                frame = frame_number,
                label = %det.label,
                id = id.0,
                best = ?best,
                "assigned detection"
            );
            let record = FrameRecord::new(frame_number, det.mask, det.axis_bbox, det.rotated_bbox);
            self.store.append_frame_to_instance(id, record, Some(det.label))?;
            assigned.push(id);
        }

        // Step 3: sweep instances that received nothing this frame
        let evicted = self.store.clean(frame_number);
        debug!(
            frame = frame_number,
            detections = assigned.len(),
            live = self.store.len(),
            evicted = evicted.len(),
            "frame tracked"
        );

        Ok(FrameUpdate {
            frame_number,
            assigned,
            evicted,
        })
    }

    fn score(&self, det: &Detection, prev_frame: Option<u32>) -> Result<Option<Candidate>> {
        let Some(prev) = prev_frame else {
            return Ok(None);
        };
        let candidates = self.store.get_instances_of_type_in_frame(&det.label, prev);
        matching::best_candidate(det.mask.view(), &candidates, prev)
    }

    /// Force-evict every instance still live at end of stream.
    pub fn finish(&mut self) -> Vec<Instance> {
        self.store.drain()
    }

    /// Overlay annotations for `frame_number`.
    pub fn annotations(&self, frame_number: u32) -> Result<Vec<Annotation>> {
        self.store.annotations(frame_number)
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.last_frame
    }
}
