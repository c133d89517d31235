// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use seat_occupancy_rs::{BBox, Detection, EngineConfig, OccupancyEngine, Snapshot};

fn person_at(cx: f32, cy: f32) -> Detection {
    Detection::new(BBox::new(cx - 15.0, cy - 30.0, cx + 15.0, cy + 30.0))
}

fn engine(zones: Vec<BBox>) -> OccupancyEngine {
    OccupancyEngine::new(&EngineConfig::default(), zones, Some(25.0)).unwrap()
}

#[test]
fn test_enter_exit_scenario() {
    let mut engine = engine(vec![BBox::new(0.0, 0.0, 100.0, 100.0)]);

    // 40-49帧: 区域外; 50-124帧: 区域内; 125帧: 离开; 之后不再出现
    for frame in 40..50 {
        let s = engine.process_frame(frame, &[person_at(140.0, 50.0)]).unwrap();
        assert_eq!(s.occupied_count, 0);
    }
    for frame in 50..125 {
        let s = engine.process_frame(frame, &[person_at(70.0, 50.0)]).unwrap();
        assert_eq!(s.occupied_count, 1);
        assert_eq!(s.tracks[0].id, 0);
    }
    let s = engine.process_frame(125, &[person_at(140.0, 50.0)]).unwrap();
    assert_eq!(s.occupied_count, 0);
    assert_eq!(s.empty_count, 1);
    assert_eq!(s.zones[0].cumulative_dwell_seconds, 3.0);
    assert_eq!(s.tracks[0].id, 0);
    assert_eq!(s.tracks[0].elapsed_seconds, 5.0 - 1.6);

    // t = 6.0: 丢失恰好 1.0s, 仍保留
    for frame in 126..=150 {
        let s = engine.process_frame(frame, &[]).unwrap();
        assert_eq!(s.active_tracks, 1);
    }
    let s = engine.process_frame(151, &[]).unwrap();
    assert_eq!(s.active_tracks, 0);
    assert_eq!(s.zones[0].cumulative_dwell_seconds, 3.0);

    // 重新出现 → 新ID
    let s = engine.process_frame(152, &[person_at(140.0, 50.0)]).unwrap();
    assert_eq!(s.tracks[0].id, 1);

    let summary = engine.finalize();
    assert_eq!(summary.tracks_created, 2);
    assert_eq!(summary.zones[0].cumulative_dwell_seconds, 3.0);
}

#[test]
fn test_status_line_and_labels() {
    let mut engine = engine(vec![
        BBox::new(0.0, 0.0, 100.0, 100.0),
        BBox::new(300.0, 0.0, 400.0, 100.0),
    ]);
    let mut last = None;
    for frame in 1..=60 {
        last = Some(engine.process_frame(frame, &[person_at(50.0, 50.0)]).unwrap());
    }
    let s = last.unwrap();
    assert_eq!(s.status_line(), "People: 1  Occupied: 1  Empty: 1");
    assert_eq!(s.tracks[0].label(), "ID0 2s");
    assert_eq!(s.zones[1].label(), "S1");
}

fn random_stream(seed: u64, frames: u64) -> Vec<Vec<Detection>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut people: Vec<(f32, f32)> = (0..4)
        .map(|_| (rng.gen_range(0.0..640.0), rng.gen_range(0.0..480.0)))
        .collect();

    (0..frames)
        .map(|_| {
            for p in people.iter_mut() {
                p.0 += rng.gen_range(-30.0..30.0);
                p.1 += rng.gen_range(-30.0..30.0);
            }
            people
                .iter()
                .filter(|_| rng.gen_bool(0.8)) // 模拟漏检
                .map(|&(x, y)| person_at(x, y))
                .collect()
        })
        .collect()
}

fn replay(stream: &[Vec<Detection>]) -> Vec<Snapshot> {
    let mut engine = engine(vec![
        BBox::new(0.0, 0.0, 320.0, 240.0),
        BBox::new(320.0, 240.0, 640.0, 480.0),
    ]);
    stream
        .iter()
        .enumerate()
        .map(|(i, dets)| engine.process_frame(i as u64 + 1, dets).unwrap())
        .collect()
}

#[test]
fn test_replay_is_deterministic() {
    let stream = random_stream(7, 300);
    assert_eq!(replay(&stream), replay(&stream));
}

#[test]
fn test_ids_strictly_increasing() {
    let stream = random_stream(42, 500);
    let snapshots = replay(&stream);

    let mut max_seen: Option<u64> = None;
    let mut retired = std::collections::BTreeSet::new();
    let mut prev_ids: Vec<u64> = Vec::new();

    for s in &snapshots {
        let ids: Vec<u64> = s.tracks.iter().map(|t| t.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        for id in &prev_ids {
            if !ids.contains(id) {
                retired.insert(*id);
            }
        }
        for id in &ids {
            assert!(!retired.contains(id), "ID{} reused after retirement", id);
            // 新出现的ID必须大于之前见过的所有ID
            if !prev_ids.contains(id) {
                assert!(max_seen.map_or(true, |m| *id > m));
                max_seen = Some(*id);
            }
        }
        prev_ids = ids;
    }

    for s in &snapshots {
        for z in &s.zones {
            assert!(z.cumulative_dwell_seconds >= 0.0);
        }
    }
}
