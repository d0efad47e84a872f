//! Live instance storage and identity allocation.

use crate::error::{Result, TrackError};
use crate::tracker::instance::{FrameRecord, IdAllocator, Instance, InstanceId};
use crate::tracker::matching::Label;
use crate::tracker::quad::Quad;

/// Read-only view of a live instance in one frame, for overlay rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub instance_id: InstanceId,
    pub label: Label,
    pub axis_bbox: Quad,
    pub rotated_bbox: Quad,
}

impl Annotation {
    /// Overlay text, e.g. `"kicking 3"`.
    pub fn caption(&self) -> String {
        format!("{} {}", self.label, self.instance_id)
    }
}

/// Authoritative set of live (not yet evicted) instances.
#[derive(Debug, Default)]
pub struct InstanceStore {
    live: Vec<Instance>,
    ids: IdAllocator,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the live instance `instance_id`, or create it.
    ///
    /// `label_if_new` is only consulted when the instance does not exist yet;
    /// creating an instance without a label is a contract violation.
    pub fn append_frame_to_instance(
        &mut self,
        instance_id: InstanceId,
        record: FrameRecord,
        label_if_new: Option<Label>,
    ) -> Result<()> {
        if let Some(inst) = self.live.iter_mut().find(|i| i.id == instance_id) {
            inst.push(record);
            return Ok(());
        }
        let label = label_if_new.ok_or(TrackError::InvalidAppend { id: instance_id })?;
        self.live.push(Instance::new(instance_id, label, record));
        Ok(())
    }

    /// Ids of live instances recorded in `frame_number`.
    pub fn get_instance_ids_in_frame(&self, frame_number: u32) -> Vec<InstanceId> {
        self.live
            .iter()
            .filter(|i| i.has_frame(frame_number))
            .map(|i| i.id)
            .collect()
    }

    /// Live instances of `label` recorded in `frame_number`, in store order.
    pub fn get_instances_of_type_in_frame(&self, label: &Label, frame_number: u32) -> Vec<&Instance> {
        self.live
            .iter()
            .filter(|i| &i.label == label && i.has_frame(frame_number))
            .collect()
    }

    pub fn get_instances_in_frame(&self, frame_number: u32) -> Vec<&Instance> {
        self.live.iter().filter(|i| i.has_frame(frame_number)).collect()
    }

    pub fn get_unused_instance_id(&mut self) -> InstanceId {
        self.ids.next_id()
    }

    pub fn get(&self, instance_id: InstanceId) -> Option<&Instance> {
        self.live.iter().find(|i| i.id == instance_id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Evict every live instance not recorded in `frame_number`.
    ///
    /// Returns the evicted instances in store order; the kept ones stay live.
    pub fn clean(&mut self, frame_number: u32) -> Vec<Instance> {
        let (kept, evicted): (Vec<_>, Vec<_>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|i| i.has_frame(frame_number));
        self.live = kept;
        evicted
    }

    /// Evict everything. Used at end of stream.
    pub fn drain(&mut self) -> Vec<Instance> {
        std::mem::take(&mut self.live)
    }

    /// Overlay annotations for all live instances in `frame_number`.
    pub fn annotations(&self, frame_number: u32) -> Result<Vec<Annotation>> {
        self.get_instances_in_frame(frame_number)
            .into_iter()
            .map(|inst| {
                let record = inst.frame(frame_number)?;
                Ok(Annotation {
                    instance_id: inst.id,
                    label: inst.label.clone(),
                    axis_bbox: record.axis_bbox,
                    rotated_bbox: record.rotated_bbox,
                })
            })
            .collect()
    }
}
