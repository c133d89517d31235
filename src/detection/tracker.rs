// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 多目标跟踪 (最近质心贪心匹配)
//! Greedy nearest-centroid multi-object tracking

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::types::{BBox, Detection, Point2};
use crate::error::{Error, Result};

/// 跟踪ID: 单调递增,整个运行期内不复用
pub type TrackId = u64;

/// 默认最大匹配距离 (像素)
pub const DEFAULT_MAX_DIST: f32 = 80.0;

/// 默认最大丢失时间 (秒)
pub const DEFAULT_MAX_MISS_TIME: f64 = 1.0;

// ========== 公共数据结构 ==========

/// 跟踪对象 (一个被跟踪的人)
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: TrackId,

    /// 最近一次匹配到的边界框
    bbox: BBox,

    /// 创建时间 (不可变)
    start_time: f64,

    /// 最近一次匹配时间
    last_seen: f64,
}

impl Track {
    fn new(id: TrackId, bbox: BBox, t: f64) -> Self {
        Self {
            id,
            bbox,
            start_time: t,
            last_seen: t,
        }
    }

    fn update(&mut self, bbox: BBox, t: f64) {
        self.bbox = bbox;
        self.last_seen = t;
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }

    /// 最后已知中心点
    pub fn center(&self) -> Point2 {
        self.bbox.center()
    }

    /// 已跟踪时长 (秒)
    pub fn elapsed(&self, t: f64) -> f64 {
        t - self.start_time
    }
}

/// 帧内匹配标记
///
/// 每帧新建,记录本帧已被占用的轨迹,帧结束即丢弃,不写入轨迹本身。
#[derive(Debug, Default, Clone)]
pub struct MatchSet {
    matched: BTreeSet<TrackId>,
}

impl MatchSet {
    pub fn contains(&self, id: TrackId) -> bool {
        self.matched.contains(&id)
    }

    fn mark(&mut self, id: TrackId) {
        self.matched.insert(id);
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

// ========== 跟踪器统一接口 ==========

/// 多目标跟踪器 Trait
pub trait Tracker {
    /// 处理一帧: 匹配检测框 + 清理过期轨迹
    ///
    /// `t` 必须不小于上一次调用的时间戳。
    fn update(&mut self, detections: &[Detection], t: f64) -> Result<()>;

    /// 当前所有活跃轨迹 (按ID升序)
    fn tracks(&self) -> &BTreeMap<TrackId, Track>;

    /// 重置跟踪器 (清除所有轨迹,ID计数不回退)
    fn reset(&mut self);

    /// 运行以来创建的轨迹总数
    fn total_created(&self) -> u64;

    /// 获取当前跟踪数量
    fn track_count(&self) -> usize {
        self.tracks().len()
    }
}

// ========== 质心跟踪器 ==========

/// 最近质心跟踪器
///
/// 检测框按输入顺序依次处理,每个检测框取当前可用的最近轨迹。
/// 这是贪心匹配,不保证全局最优: 轨迹交叉时可能发生ID交换。
#[derive(Debug, Clone)]
pub struct CentroidTracker {
    tracks: BTreeMap<TrackId, Track>,

    /// 下一个分配的ID
    next_id: TrackId,

    /// 最大匹配距离 (像素, 包含边界)
    max_dist: f32,

    /// 最大丢失时间 (秒, 严格大于才删除)
    max_miss_time: f64,

    /// 最近一次处理的时间戳
    last_time: Option<f64>,
}

impl CentroidTracker {
    pub fn new(max_dist: f32, max_miss_time: f64) -> Result<Self> {
        if !max_dist.is_finite() || max_dist < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "max_dist must be a non-negative number, got {max_dist}"
            )));
        }
        if !max_miss_time.is_finite() || max_miss_time < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "max_miss_time must be a non-negative number, got {max_miss_time}"
            )));
        }

        Ok(Self {
            tracks: BTreeMap::new(),
            next_id: 0,
            max_dist,
            max_miss_time,
            last_time: None,
        })
    }

    pub fn max_dist(&self) -> f32 {
        self.max_dist
    }

    pub fn max_miss_time(&self) -> f64 {
        self.max_miss_time
    }

    /// 开始新的一帧: 返回空的帧内匹配标记
    pub fn begin_frame(&self) -> MatchSet {
        MatchSet::default()
    }

    /// 检测框 → 轨迹分配
    ///
    /// 对每个检测框 (输入顺序):
    /// 1. 在本帧尚未匹配的轨迹中找中心距离最近者
    /// 2. 距离 <= max_dist: 更新该轨迹并标记为已匹配
    /// 3. 否则新建轨迹 (新ID),同样标记为已匹配
    pub fn match_detections(
        &mut self,
        matched: &mut MatchSet,
        detections: &[Detection],
        t: f64,
    ) -> Result<()> {
        self.check_time(t)?;

        for det in detections {
            let mut best: Option<(TrackId, f32)> = None;
            for (&id, track) in &self.tracks {
                if matched.contains(id) {
                    continue;
                }
                let d = det.center.distance(&track.center());
                // 严格小于: 距离相同时保留ID较小者
                if best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((id, d));
                }
            }

            match best {
                Some((id, d)) if d <= self.max_dist => {
                    if let Some(track) = self.tracks.get_mut(&id) {
                        track.update(det.bbox, t);
                    }
                    matched.mark(id);
                }
                _ => {
                    let id = self.allocate_id();
                    debug!("🆕 新轨迹 ID{} @ {:.2}s", id, t);
                    self.tracks.insert(id, Track::new(id, det.bbox, t));
                    matched.mark(id);
                }
            }
        }

        self.last_time = Some(t);
        Ok(())
    }

    /// 删除 `t - last_seen > max_miss_time` 的轨迹,返回被删除的ID
    pub fn prune_stale(&mut self, t: f64) -> Result<Vec<TrackId>> {
        self.check_time(t)?;

        let max_miss_time = self.max_miss_time;
        let stale: Vec<TrackId> = self
            .tracks
            .values()
            .filter(|tr| t - tr.last_seen > max_miss_time)
            .map(|tr| tr.id)
            .collect();

        for id in &stale {
            self.tracks.remove(id);
            debug!("🗑️ 轨迹 ID{} 丢失超时, 已删除 @ {:.2}s", id, t);
        }

        self.last_time = Some(t);
        Ok(stale)
    }

    /// 当前活跃轨迹 (按ID升序)
    pub fn active_tracks(&self) -> impl ExactSizeIterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    fn allocate_id(&mut self) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_time(&self, t: f64) -> Result<()> {
        match self.last_time {
            Some(previous) if t < previous => Err(Error::NonMonotonicTimestamp {
                previous,
                current: t,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: 0,
            max_dist: DEFAULT_MAX_DIST,
            max_miss_time: DEFAULT_MAX_MISS_TIME,
            last_time: None,
        }
    }
}

impl Tracker for CentroidTracker {
    fn update(&mut self, detections: &[Detection], t: f64) -> Result<()> {
        self.check_time(t)?;
        let mut matched = self.begin_frame();
        self.match_detections(&mut matched, detections, t)?;
        self.prune_stale(t)?;
        Ok(())
    }

    fn tracks(&self) -> &BTreeMap<TrackId, Track> {
        &self.tracks
    }

    fn reset(&mut self) {
        self.tracks.clear();
        self.last_time = None;
    }

    fn total_created(&self) -> u64 {
        self.next_id
    }
}

// ========== 工具函数 ==========

/// 根据ID生成不同颜色 (供外部渲染使用)
pub fn id_to_color(id: TrackId) -> (u8, u8, u8) {
    let hue = (id as f32 * 137.508) % 360.0; // 黄金角度采样
    hsv_to_rgb(hue, 0.8, 0.9)
}

/// HSV转RGB
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det_at(cx: f32, cy: f32) -> Detection {
        Detection::new(BBox::new(cx - 10.0, cy - 20.0, cx + 10.0, cy + 20.0))
    }

    fn ids(tracker: &CentroidTracker) -> Vec<TrackId> {
        tracker.active_tracks().map(|t| t.id()).collect()
    }

    #[test]
    fn test_new_tracks_get_increasing_ids() {
        let mut tracker = CentroidTracker::default();
        tracker
            .update(&[det_at(0.0, 0.0), det_at(500.0, 0.0)], 0.04)
            .unwrap();
        assert_eq!(ids(&tracker), vec![0, 1]);

        let t0 = tracker.get(0).unwrap();
        assert_eq!(t0.start_time(), 0.04);
        assert_eq!(t0.last_seen(), 0.04);
    }

    #[test]
    fn test_match_within_threshold() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(100.0, 100.0)], 0.0).unwrap();
        tracker.update(&[det_at(130.0, 140.0)], 0.5).unwrap(); // 距离 50

        assert_eq!(ids(&tracker), vec![0]);
        let tr = tracker.get(0).unwrap();
        assert_eq!(tr.center(), Point2::new(130.0, 140.0));
        assert_eq!(tr.last_seen(), 0.5);
        assert_eq!(tr.start_time(), 0.0);
        assert_eq!(tr.elapsed(0.5), 0.5);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 0.0).unwrap();
        tracker.update(&[det_at(80.0, 0.0)], 0.1).unwrap();
        assert_eq!(ids(&tracker), vec![0]);

        tracker.update(&[det_at(160.5, 0.0)], 0.2).unwrap();
        assert_eq!(ids(&tracker), vec![0, 1]);
        assert_eq!(tracker.get(0).unwrap().last_seen(), 0.1);
    }

    #[test]
    fn test_track_matched_at_most_once_per_frame() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 0.0).unwrap();

        // 两个检测框都靠近同一条轨迹: 第二个只能新建
        tracker
            .update(&[det_at(5.0, 0.0), det_at(6.0, 0.0)], 0.1)
            .unwrap();
        assert_eq!(ids(&tracker), vec![0, 1]);
        assert_eq!(tracker.get(0).unwrap().center(), Point2::new(5.0, 0.0));
        assert_eq!(tracker.get(1).unwrap().center(), Point2::new(6.0, 0.0));
    }

    #[test]
    fn test_greedy_order_dependent_assignment() {
        let mut tracker = CentroidTracker::default();
        tracker
            .update(&[det_at(0.0, 0.0), det_at(70.0, 0.0)], 0.0)
            .unwrap();

        // 最优分配为 d1→0, d2→1; 贪心下 d1 先抢走轨迹1, d2 距轨迹0为100 > 80 → 新建
        tracker
            .update(&[det_at(40.0, 0.0), det_at(100.0, 0.0)], 0.1)
            .unwrap();

        assert_eq!(ids(&tracker), vec![0, 1, 2]);
        assert_eq!(tracker.get(1).unwrap().center(), Point2::new(40.0, 0.0));
        assert_eq!(tracker.get(2).unwrap().center(), Point2::new(100.0, 0.0));
        assert_eq!(tracker.get(0).unwrap().last_seen(), 0.0);
    }

    #[test]
    fn test_tie_prefers_lower_id() {
        let mut tracker = CentroidTracker::default();
        tracker
            .update(&[det_at(0.0, 0.0), det_at(100.0, 0.0)], 0.0)
            .unwrap();
        tracker.update(&[det_at(50.0, 0.0)], 0.1).unwrap();
        assert_eq!(tracker.get(0).unwrap().last_seen(), 0.1);
        assert_eq!(tracker.get(1).unwrap().last_seen(), 0.0);
    }

    #[test]
    fn test_begin_frame_is_fresh() {
        let mut tracker = CentroidTracker::default();
        let mut matched = tracker.begin_frame();
        tracker
            .match_detections(&mut matched, &[det_at(0.0, 0.0)], 0.0)
            .unwrap();
        assert!(matched.contains(0));
        assert_eq!(matched.len(), 1);

        // 下一帧轨迹0重新可用
        let mut matched = tracker.begin_frame();
        assert!(matched.is_empty());
        tracker
            .match_detections(&mut matched, &[det_at(1.0, 0.0)], 0.1)
            .unwrap();
        assert_eq!(ids(&tracker), vec![0]);
    }

    #[test]
    fn test_stale_boundary_is_strict() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 1.0).unwrap();

        // 恰好 max_miss_time: 保留
        assert!(tracker.prune_stale(2.0).unwrap().is_empty());
        assert_eq!(tracker.track_count(), 1);

        assert_eq!(tracker.prune_stale(2.5).unwrap(), vec![0]);
        assert_eq!(tracker.track_count(), 0);
    }

    #[test]
    fn test_ids_not_reused_after_retirement() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 0.0).unwrap();
        tracker.update(&[], 2.0).unwrap();
        assert_eq!(tracker.track_count(), 0);

        // 同一位置重新出现 → 新ID
        tracker.update(&[det_at(0.0, 0.0)], 2.1).unwrap();
        assert_eq!(ids(&tracker), vec![1]);
        assert_eq!(tracker.total_created(), 2);
    }

    #[test]
    fn test_empty_detections_age_tracks() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 0.0).unwrap();
        tracker.update(&[], 0.5).unwrap();
        assert_eq!(tracker.track_count(), 1);
        assert_eq!(tracker.get(0).unwrap().last_seen(), 0.0);
    }

    #[test]
    fn test_backwards_time_rejected() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 1.0).unwrap();

        let err = tracker.update(&[det_at(500.0, 0.0)], 0.5).unwrap_err();
        assert!(matches!(err, Error::NonMonotonicTimestamp { .. }));
        assert_eq!(ids(&tracker), vec![0]);
        assert!(tracker.prune_stale(0.9).is_err());

        // 相同时间戳允许
        tracker.update(&[], 1.0).unwrap();
    }

    #[test]
    fn test_reset_keeps_id_counter() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det_at(0.0, 0.0)], 5.0).unwrap();
        tracker.reset();
        assert_eq!(tracker.track_count(), 0);
        tracker.update(&[det_at(0.0, 0.0)], 0.0).unwrap();
        assert_eq!(ids(&tracker), vec![1]);
    }

    #[test]
    fn test_invalid_params() {
        assert!(CentroidTracker::new(-1.0, 1.0).is_err());
        assert!(CentroidTracker::new(80.0, f64::NAN).is_err());
        assert!(CentroidTracker::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_id_to_color_stable() {
        assert_eq!(id_to_color(3), id_to_color(3));
        assert_ne!(id_to_color(0), id_to_color(1));
    }
}
