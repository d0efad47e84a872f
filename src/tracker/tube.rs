//! Spatiotemporal tubes built from finalized instances.

use serde::{Deserialize, Serialize};

use crate::tracker::instance::{Instance, InstanceId};

/// Bounding box and frame range of one instance over its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tube {
    pub label: String,
    pub instance_id: InstanceId,
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    /// First frame, inclusive
    pub min_frame: u32,
    /// Last frame, inclusive
    pub max_frame: u32,
}

/// Padded tube box clamped to the frame, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl CropRegion {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

impl Tube {
    /// Reduce an evicted instance to its tube.
    ///
    /// Extents cover every corner of every axis-aligned box the instance had.
    pub fn from_instance(instance: &Instance) -> Self {
        let mut tube = Self {
            label: instance.label.to_string(),
            instance_id: instance.id,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
            min_frame: u32::MAX,
            max_frame: 0,
        };
        for record in instance.frames() {
            tube.min_frame = tube.min_frame.min(record.frame_number);
            tube.max_frame = tube.max_frame.max(record.frame_number);
            for p in &record.axis_bbox.corners {
                tube.min_x = tube.min_x.min(p.x);
                tube.min_y = tube.min_y.min(p.y);
                tube.max_x = tube.max_x.max(p.x);
                tube.max_y = tube.max_y.max(p.y);
            }
        }
        tube
    }

    /// Frame span, `max_frame - min_frame`.
    pub fn duration(&self) -> u32 {
        self.max_frame - self.min_frame
    }

    /// Whether the tube is long enough to export. The boundary is inclusive.
    pub fn keep(&self, min_duration: u32) -> bool {
        self.duration() >= min_duration
    }

    /// Box grown by `padding` on every side and clamped to `width` x `height`.
    pub fn crop(&self, padding: u32, width: u32, height: u32) -> CropRegion {
        let pad = i64::from(padding);
        let clamp = |v: i64, hi: u32| v.clamp(0, i64::from(hi)) as u32;
        CropRegion {
            min_x: clamp(i64::from(self.min_x) - pad, width),
            min_y: clamp(i64::from(self.min_y) - pad, height),
            max_x: clamp(i64::from(self.max_x) + pad, width),
            max_y: clamp(i64::from(self.max_y) + pad, height),
        }
    }
}

/// Collects tubes from evicted instances over a run.
#[derive(Debug)]
pub struct TubeCollector {
    min_tube_length: u32,
    enabled: bool,
    tubes: Vec<Tube>,
}

impl TubeCollector {
    pub fn new(min_tube_length: u32, enabled: bool) -> Self {
        Self {
            min_tube_length,
            enabled,
            tubes: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.tubes.clear();
    }

    /// Finalize evicted instances. Ignored while export is disabled.
    pub fn absorb(&mut self, evicted: &[Instance]) {
        if !self.enabled {
            return;
        }
        self.tubes.extend(evicted.iter().map(Tube::from_instance));
    }

    /// Number of tubes finalized so far, before the duration filter.
    pub fn pending(&self) -> usize {
        self.tubes.len()
    }

    /// Accepted tubes, in eviction order.
    pub fn finish(self) -> Vec<Tube> {
        let min = self.min_tube_length;
        self.tubes.into_iter().filter(|t| t.keep(min)).collect()
    }
}
