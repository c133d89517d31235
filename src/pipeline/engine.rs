// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 占用分析引擎 (Occupancy Engine)
//!
//! 单线程、逐帧同步: 一帧必须完整处理 (匹配 → 清理 → 区域更新 → 快照) 后才能处理下一帧。
//! 时间戳由帧序号推出,跳过的帧只要帧序号照常递增,时间就会正确前进。

use tracing::{debug, info};

use super::FrameInput;
use crate::clock::FrameClock;
use crate::config::EngineConfig;
use crate::detection::tracker::{CentroidTracker, Tracker};
use crate::detection::types::{BBox, Detection};
use crate::error::{Error, Result};
use crate::occupancy::OccupancyAccumulator;
use crate::report::{OccupancySummary, Snapshot, TrackView};

pub struct OccupancyEngine<T = CentroidTracker> {
    clock: FrameClock,
    tracker: T,
    accumulator: OccupancyAccumulator,

    /// 第一帧的帧序号 (0 或 1)
    first_frame_index: u64,

    // 统计
    frames_processed: u64,
    last_frame: Option<u64>,
    last_time: Option<f64>,
}

impl OccupancyEngine<CentroidTracker> {
    /// 按配置创建; `reported_fps` 为视频源报告的帧率 (可缺失)
    pub fn new(
        config: &EngineConfig,
        zones: Vec<BBox>,
        reported_fps: Option<f64>,
    ) -> Result<Self> {
        let clock = FrameClock::from_reported(reported_fps, config.default_frame_rate)?;
        let tracker = CentroidTracker::new(config.max_dist, config.max_miss_time)?;
        info!(
            "🚀 占用分析引擎: {} 个座位, {:.1} fps",
            zones.len(),
            clock.frame_rate()
        );
        Ok(Self::with_tracker(
            tracker,
            clock,
            zones,
            config.first_frame_index,
        ))
    }
}

impl<T: Tracker> OccupancyEngine<T> {
    pub fn with_tracker(tracker: T, clock: FrameClock, zones: Vec<BBox>, first_frame_index: u64) -> Self {
        Self {
            clock,
            tracker,
            accumulator: OccupancyAccumulator::new(zones),
            first_frame_index,
            frames_processed: 0,
            last_frame: None,
            last_time: None,
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn accumulator(&self) -> &OccupancyAccumulator {
        &self.accumulator
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// 处理一帧
    ///
    /// 帧序号倒退或小于第一帧序号时返回错误,引擎状态不变。
    pub fn process_frame(&mut self, frame_index: u64, detections: &[Detection]) -> Result<Snapshot> {
        if frame_index < self.first_frame_index {
            return Err(Error::InvalidParameter(format!(
                "frame index {} precedes first frame index {}",
                frame_index, self.first_frame_index
            )));
        }

        let t = self.clock.timestamp(frame_index);
        if let Some(previous) = self.last_time {
            if t < previous {
                return Err(Error::NonMonotonicTimestamp {
                    previous,
                    current: t,
                });
            }
        }

        // 1. 跟踪: 匹配 + 清理过期轨迹
        self.tracker.update(detections, t)?;

        // 2. 区域占用
        self.accumulator.update(self.tracker.tracks().values(), t)?;

        self.frames_processed += 1;
        self.last_frame = Some(frame_index);
        self.last_time = Some(t);

        let snapshot = self.snapshot();
        debug!("frame {} @ {:.2}s: {}", frame_index, t, snapshot.status_line());
        Ok(snapshot)
    }

    pub fn process(&mut self, input: &FrameInput) -> Result<Snapshot> {
        self.process_frame(input.frame_index, &input.detections)
    }

    /// 当前状态快照; 两次 `process_frame` 之间多次调用结果相同
    pub fn snapshot(&self) -> Snapshot {
        let t = self.last_time.unwrap_or(0.0);
        let tracks: Vec<TrackView> = self
            .tracker
            .tracks()
            .values()
            .map(|tr| TrackView::from_track(tr, t))
            .collect();

        Snapshot {
            frame_index: self.last_frame.unwrap_or(self.first_frame_index),
            timestamp: t,
            active_tracks: tracks.len(),
            tracks,
            zones: self.accumulator.snapshot(),
            occupied_count: self.accumulator.occupied_count(),
            empty_count: self.accumulator.empty_count(),
        }
    }

    /// 输入结束: 以最后处理的时间戳结算未关闭的占用区间,返回汇总
    pub fn finalize(&mut self) -> OccupancySummary {
        let flushed = self.accumulator.finalize();
        if flushed > 0.0 {
            info!("⏹️ 结算未关闭的占用区间: {:.2}s", flushed);
        }

        OccupancySummary::new(
            self.accumulator.zones(),
            self.frames_processed,
            self.last_time.unwrap_or(0.0),
            self.tracker.total_created(),
        )
    }
}
