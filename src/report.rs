// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 输出快照 (引擎 → 外部渲染/导出)
//!
//! 只读数据: 渲染、写视频、导出CSV都由外部完成,这里只给出每帧的状态和叠加文字。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detection::tracker::{id_to_color, Track, TrackId};
use crate::detection::types::BBox;
use crate::occupancy::zone::{Zone, ZoneId};

/// 轨迹视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    pub id: TrackId,
    pub bbox: BBox,
    pub elapsed_seconds: f64,
    /// 显示颜色 (每个ID不同颜色)
    pub color: (u8, u8, u8),
}

impl TrackView {
    pub fn from_track(track: &Track, t: f64) -> Self {
        Self {
            id: track.id(),
            bbox: *track.bbox(),
            elapsed_seconds: track.elapsed(t),
            color: id_to_color(track.id()),
        }
    }

    /// 叠加标签, 例如 `ID3 12s` (秒数取整)
    pub fn label(&self) -> String {
        format!("ID{} {}s", self.id, self.elapsed_seconds.trunc() as i64)
    }
}

/// 区域视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneView {
    pub id: ZoneId,
    pub bbox: BBox,
    pub occupied: bool,
    /// 已关闭区间的累计时长
    pub cumulative_dwell_seconds: f64,
    /// 当前未关闭区间已持续的时长 (空闲时为0)
    pub open_interval_seconds: f64,
}

impl ZoneView {
    pub fn from_zone(zone: &Zone, t: f64) -> Self {
        Self {
            id: zone.id(),
            bbox: *zone.bbox(),
            occupied: zone.is_occupied(),
            cumulative_dwell_seconds: zone.cumulative_dwell(),
            open_interval_seconds: zone.open_interval(t),
        }
    }

    pub fn label(&self) -> String {
        format!("S{}", self.id)
    }
}

/// 单帧快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame_index: u64,
    pub timestamp: f64,
    pub tracks: Vec<TrackView>,
    pub zones: Vec<ZoneView>,
    pub active_tracks: usize,
    pub occupied_count: usize,
    pub empty_count: usize,
}

impl Snapshot {
    /// 画面左上角状态行
    pub fn status_line(&self) -> String {
        format!(
            "People: {}  Occupied: {}  Empty: {}",
            self.active_tracks, self.occupied_count, self.empty_count
        )
    }
}

/// 单区域汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub id: ZoneId,
    pub bbox: BBox,
    pub cumulative_dwell_seconds: f64,
    /// 占用时长 / 处理总时长 (0-1)
    pub utilization: f64,
}

/// 运行结束汇总
#[derive(Debug, Clone, Serialize)]
pub struct OccupancySummary {
    pub generated_at: DateTime<Utc>,
    pub frames_processed: u64,
    pub duration_seconds: f64,
    pub zone_count: usize,
    pub tracks_created: u64,
    pub zones: Vec<ZoneSummary>,
}

impl OccupancySummary {
    pub fn new<'a>(
        zones: impl IntoIterator<Item = &'a Zone>,
        frames_processed: u64,
        duration_seconds: f64,
        tracks_created: u64,
    ) -> Self {
        let zones: Vec<ZoneSummary> = zones
            .into_iter()
            .map(|zone| ZoneSummary {
                id: zone.id(),
                bbox: *zone.bbox(),
                cumulative_dwell_seconds: zone.cumulative_dwell(),
                utilization: if duration_seconds > 0.0 {
                    (zone.cumulative_dwell() / duration_seconds).clamp(0.0, 1.0)
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            frames_processed,
            duration_seconds,
            zone_count: zones.len(),
            tracks_created,
            zones,
        }
    }

    /// 控制台打印
    pub fn print_summary(&self) {
        println!("\n📊 座位占用汇总 ({})", self.generated_at.format("%Y-%m-%d %H:%M:%S"));
        println!(
            "  处理帧数: {}  时长: {:.1}s  座位数: {}  累计人数(ID): {}",
            self.frames_processed, self.duration_seconds, self.zone_count, self.tracks_created
        );
        for zone in &self.zones {
            println!(
                "  S{}: {:.1}s ({:.0}%)",
                zone.id,
                zone.cumulative_dwell_seconds,
                zone.utilization * 100.0
            );
        }
    }
}
