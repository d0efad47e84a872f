use std::collections::HashSet;

use ndarray::s;
use tubetrack::tracker::{FrameRecord, Mask};
use tubetrack::{
    Detection, DetectionBuilder, InstanceId, InstanceStore, JsonDetectionSource, Label, MaskTracker,
    Quad, TrackerPipeline, TrackingConfig, Tube,
};

const W: usize = 64;
const H: usize = 48;

fn mask(x: usize, y: usize, w: usize, h: usize) -> Mask {
    let mut m = Mask::zeros((H, W));
    m.slice_mut(s![y..y + h, x..x + w]).fill(255);
    m
}

fn det(label: &str, x: usize, y: usize, w: usize, h: usize) -> Detection {
    let bbox = Quad::from_xywh(x as i32, y as i32, w as i32, h as i32);
    Detection::new(Label::new(label), mask(x, y, w, h), bbox, bbox)
}

#[test]
fn test_continuation() {
    let mut tracker = MaskTracker::new();
    let f0 = tracker.update(0, vec![det("kicking", 0, 0, 10, 10)]).unwrap();
    let id = f0.assigned[0];

    // 5x10 = 50 overlapping pixels, only candidate
    let f1 = tracker.update(1, vec![det("kicking", 5, 0, 10, 10)]).unwrap();
    assert_eq!(f1.assigned, vec![id]);
    assert!(f1.evicted.is_empty());
    assert_eq!(tracker.store().get(id).unwrap().len(), 2);
}

#[test]
fn test_contested_claim() {
    let mut tracker = MaskTracker::new();
    // ids 1 and 2 belong to another label, id 3 is the contested one
    let f0 = tracker
        .update(
            0,
            vec![
                det("waving", 40, 40, 4, 4),
                det("waving", 50, 40, 4, 4),
                det("kicking", 0, 0, 10, 10),
            ],
        )
        .unwrap();
    assert_eq!(f0.assigned[2], InstanceId(3));

    // Both detections overlap id 3 by 10 pixels
    let f1 = tracker
        .update(
            1,
            vec![
                det("waving", 40, 40, 4, 4),
                det("waving", 50, 40, 4, 4),
                det("kicking", 0, 0, 10, 1),
                det("kicking", 0, 9, 10, 1),
            ],
        )
        .unwrap();
    assert_eq!(f1.assigned, vec![InstanceId(1), InstanceId(2), InstanceId(3), InstanceId(4)]);
}

#[test]
fn test_later_higher_score_does_not_steal() {
    let mut tracker = MaskTracker::new();
    tracker.update(0, vec![det("kicking", 0, 0, 10, 10)]).unwrap();
    let f1 = tracker
        .update(1, vec![det("kicking", 0, 0, 2, 2), det("kicking", 0, 0, 10, 10)])
        .unwrap();
    // greedy first claim, no reassignment
    assert_eq!(f1.assigned, vec![InstanceId(1), InstanceId(2)]);
}

#[test]
fn test_gap_eviction() {
    let mut store = InstanceStore::new();
    for _ in 0..4 {
        store.get_unused_instance_id();
    }
    let id = store.get_unused_instance_id();
    assert_eq!(id, InstanceId(5));

    let label = Label::new("kicking");
    for f in 0..3 {
        let bbox = Quad::from_xywh(f as i32, 2, 4, 4);
        let record = FrameRecord::new(f, Mask::zeros((4, 4)), bbox, bbox);
        store.append_frame_to_instance(id, record, Some(label.clone())).unwrap();
    }

    let evicted = store.clean(3);
    assert_eq!(evicted.len(), 1);
    assert!(store.is_empty());

    let tube = Tube::from_instance(&evicted[0]);
    assert_eq!(tube.instance_id, InstanceId(5));
    assert_eq!((tube.min_frame, tube.max_frame), (0, 2));
    assert_eq!((tube.min_x, tube.min_y, tube.max_x, tube.max_y), (0, 2, 6, 6));
}

#[test]
fn test_eviction_correctness_and_unique_claims() {
    let mut tracker = MaskTracker::new();
    let frames = vec![
        vec![det("kicking", 0, 0, 8, 8), det("kicking", 20, 0, 8, 8), det("waving", 40, 20, 8, 8)],
        vec![det("kicking", 2, 0, 8, 8), det("kicking", 3, 1, 8, 8), det("waving", 41, 20, 8, 8)],
        vec![det("kicking", 4, 0, 8, 8), det("waving", 0, 40, 8, 8)],
        vec![],
    ];

    for (f, dets) in frames.into_iter().enumerate() {
        let f = f as u32;
        let before: Vec<_> = tracker
            .store()
            .get_instances_in_frame(f.saturating_sub(1))
            .iter()
            .map(|i| i.id)
            .collect();
        let update = tracker.update(f, dets).unwrap();

        let unique: HashSet<_> = update.assigned.iter().collect();
        assert_eq!(unique.len(), update.assigned.len());

        let live = tracker.store().get_instance_ids_in_frame(f);
        assert_eq!(live.len(), tracker.store().len());
        for inst in &update.evicted {
            assert!(!inst.has_frame(f));
            assert!(f == 0 || before.contains(&inst.id));
        }
    }
    assert!(tracker.store().is_empty());
}

#[test]
fn test_parallel_matches_sequential() {
    let frames: Vec<Vec<Detection>> = (0..6)
        .map(|f| {
            vec![
                det("kicking", f, 0, 10, 10),
                det("kicking", f + 2, 2, 10, 10),
                det("waving", 30, f, 6, 6),
                det("kicking", 50 - f, 30, 8, 8),
            ]
        })
        .collect();

    let mut seq = MaskTracker::new();
    let mut par = MaskTracker::new().with_parallel_scoring(true);
    for (f, dets) in frames.into_iter().enumerate() {
        let a = seq.update(f as u32, dets.clone()).unwrap();
        let b = par.update(f as u32, dets).unwrap();
        assert_eq!(a.assigned, b.assigned);
    }
}

#[test]
fn test_pipeline_from_json() {
    let mut frames = Vec::new();
    for f in 0..12 {
        // kicking drifts for 12 frames, waving flickers every other frame
        let mut dets = vec![format!(
            r#"{{ "label": "kicking", "axis_bbox": [[{x},2],[{x},4],[{x2},4],[{x2},2]],
                 "mask": [[2,{x},4],[3,{x},4]] }}"#,
            x = f,
            x2 = f + 4
        )];
        if f % 2 == 0 {
            dets.push(
                r#"{ "label": "waving", "axis_bbox": [[20,10],[20,12],[22,12],[22,10]],
                     "mask": [[10,20,2],[11,20,2]] }"#
                    .to_string(),
            );
        }
        dets.push(
            r#"{ "label": "Car", "axis_bbox": [[0,0],[0,1],[1,1],[1,0]], "mask": [[0,0,1]] }"#
                .to_string(),
        );
        frames.push(format!(r#"{{ "detections": [{}] }}"#, dets.join(",")));
    }
    let json = format!(r#"{{ "width": 32, "height": 16, "frames": [{}] }}"#, frames.join(","));

    let source = JsonDetectionSource::from_json(&json).unwrap();
    let cfg = TrackingConfig {
        labels: vec!["kicking".into(), "waving".into(), "Car".into()],
        min_tube_length: 10,
        ..Default::default()
    };
    let summary = TrackerPipeline::new(source, &cfg).run().unwrap();

    assert!(summary.export_enabled);
    assert_eq!(summary.tubes.len(), 1);
    let tube = &summary.tubes[0];
    assert_eq!(tube.label, "kicking");
    assert_eq!(tube.instance_id, InstanceId(1));
    assert_eq!((tube.min_frame, tube.max_frame), (0, 11));
    assert_eq!((tube.min_x, tube.min_y, tube.max_x, tube.max_y), (0, 2, 15, 4));

    let crop = tube.crop(50, 32, 16);
    assert_eq!((crop.min_x, crop.min_y, crop.max_x, crop.max_y), (0, 0, 32, 16));
}

#[test]
fn test_builder_feeds_tracker() {
    let build = |x| {
        DetectionBuilder::new()
            .label("kicking")
            .frame_size(W as u32, H as u32)
            .xywh(x, 0, 6, 6)
            .fill_bbox()
            .build()
            .unwrap()
    };
    let mut tracker = MaskTracker::new();
    tracker.update(0, vec![build(0)]).unwrap();
    let f1 = tracker.update(1, vec![build(3)]).unwrap();
    assert_eq!(f1.assigned, vec![InstanceId(1)]);

    let rest = tracker.finish();
    let tube = Tube::from_instance(&rest[0]);
    assert!(tube.keep(1));
    assert!(!tube.keep(2));
}

#[test]
fn test_default_config_tracks_source_labels() {
    let frames: Vec<String> = (0..3)
        .map(|_| {
            r#"{ "detections": [
                { "label": "kicking", "axis_bbox": [[2,2],[2,6],[6,6],[6,2]],
                  "mask": [[2,2,4],[3,2,4],[4,2,4],[5,2,4]] },
                { "label": "Ground", "axis_bbox": [[0,0],[0,1],[1,1],[1,0]], "mask": [[0,0,1]] }
            ] }"#
                .to_string()
        })
        .collect();
    let json = format!(r#"{{ "width": 8, "height": 8, "frames": [{}] }}"#, frames.join(","));
    let source = JsonDetectionSource::from_json(&json).unwrap();

    let cfg = TrackingConfig {
        min_tube_length: 0,
        ..Default::default()
    };
    let summary = TrackerPipeline::new(source, &cfg).run().unwrap();

    // excluded labels stay excluded when discovered from the source
    assert_eq!(summary.tubes.len(), 1);
    assert_eq!(summary.tubes[0].label, "kicking");
    assert_eq!((summary.tubes[0].min_frame, summary.tubes[0].max_frame), (0, 2));
}
