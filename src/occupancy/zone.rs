// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 区域 (座位) 定义与单区域占用状态

use crate::detection::types::{BBox, Point2};

/// 区域ID: 定义顺序下标,运行期内稳定
pub type ZoneId = usize;

/// 静态感兴趣区域 + 占用计时状态
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: ZoneId,

    /// 区域矩形 (定义后不可变)
    bbox: BBox,

    /// 上一帧是否占用
    occupied_prev: bool,

    /// 本帧是否占用
    occupied_now: bool,

    /// 当前连续占用区间的起始时间
    occupancy_start: Option<f64>,

    /// 累计占用时长 (秒),只增不减
    cumulative_dwell: f64,
}

impl Zone {
    pub fn new(id: ZoneId, bbox: BBox) -> Self {
        Self {
            id,
            bbox,
            occupied_prev: false,
            occupied_now: false,
            occupancy_start: None,
            cumulative_dwell: 0.0,
        }
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied_now
    }

    pub fn occupancy_start(&self) -> Option<f64> {
        self.occupancy_start
    }

    pub fn cumulative_dwell(&self) -> f64 {
        self.cumulative_dwell
    }

    /// 未关闭区间已持续的时长
    pub fn open_interval(&self, t: f64) -> f64 {
        self.occupancy_start.map_or(0.0, |start| (t - start).max(0.0))
    }

    pub fn contains(&self, p: &Point2) -> bool {
        self.bbox.contains(p)
    }

    /// 写入本帧占用状态并处理边沿,返回检测到的边沿
    pub(crate) fn step(&mut self, occupied_now: bool, t: f64) -> Edge {
        self.occupied_now = occupied_now;

        let edge = match (self.occupied_prev, occupied_now) {
            (false, true) => {
                self.occupancy_start = Some(t);
                Edge::Rising
            }
            (true, false) => {
                if let Some(start) = self.occupancy_start.take() {
                    self.cumulative_dwell += t - start;
                }
                Edge::Falling
            }
            _ => Edge::None,
        };

        self.occupied_prev = occupied_now;
        edge
    }

    /// 把未关闭区间按 `t` 结算进累计时长; 仍占用则从 `t` 重新开始计时
    pub(crate) fn flush(&mut self, t: f64) -> f64 {
        match self.occupancy_start {
            Some(start) => {
                let closed = (t - start).max(0.0);
                self.cumulative_dwell += closed;
                self.occupancy_start = Some(t);
                closed
            }
            None => 0.0,
        }
    }
}

/// 占用状态边沿
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    /// 空 → 占用
    Rising,
    /// 占用 → 空
    Falling,
}
