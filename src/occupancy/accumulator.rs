// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 区域占用累计器 (Zone Occupancy Accumulator)
//!
//! 每帧根据活跃轨迹中心计算各区域是否占用,按上升/下降沿积分占用时长。
//! 同一区域内多人仍只算一个"占用"状态,不统计人数。

use tracing::info;

use super::zone::{Edge, Zone};
use crate::detection::tracker::Track;
use crate::detection::types::{BBox, Point2};
use crate::error::{Error, Result};
use crate::report::ZoneView;

#[derive(Debug, Clone)]
pub struct OccupancyAccumulator {
    zones: Vec<Zone>,

    /// 最近一次 update 的时间戳
    last_time: Option<f64>,
}

impl OccupancyAccumulator {
    /// 区域列表在构造时固定,顺序即区域ID
    pub fn new(rects: impl IntoIterator<Item = BBox>) -> Self {
        let zones = rects
            .into_iter()
            .enumerate()
            .map(|(id, bbox)| Zone::new(id, bbox))
            .collect();

        Self {
            zones,
            last_time: None,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// 处理一帧
    ///
    /// 1. 区域内 (含边界) 有任一轨迹中心 → 占用
    /// 2. 上升沿记录起始时间; 下降沿把区间累加进总时长
    pub fn update<'a>(&mut self, tracks: impl IntoIterator<Item = &'a Track>, t: f64) -> Result<()> {
        if let Some(previous) = self.last_time {
            if t < previous {
                return Err(Error::NonMonotonicTimestamp {
                    previous,
                    current: t,
                });
            }
        }

        let centers: Vec<Point2> = tracks.into_iter().map(Track::center).collect();

        for zone in &mut self.zones {
            let occupied = centers.iter().any(|c| zone.contains(c));
            match zone.step(occupied, t) {
                Edge::Rising => info!("🪑 S{} 被占用 @ {:.2}s", zone.id(), t),
                Edge::Falling => info!(
                    "🪑 S{} 空闲 @ {:.2}s, 累计 {:.1}s",
                    zone.id(),
                    t,
                    zone.cumulative_dwell()
                ),
                Edge::None => {}
            }
        }

        self.last_time = Some(t);
        Ok(())
    }

    /// 以最近处理的时间戳结算所有未关闭的占用区间,返回本次结算的总时长
    ///
    /// 仍被占用的区域从该时间戳重新计时,因此重复调用不会重复累加。
    pub fn finalize(&mut self) -> f64 {
        let Some(t) = self.last_time else {
            return 0.0;
        };
        self.zones.iter_mut().map(|zone| zone.flush(t)).sum()
    }

    pub fn occupied_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_occupied()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.zone_count() - self.occupied_count()
    }

    /// 各区域 (是否占用, 累计时长)
    pub fn snapshot(&self) -> Vec<ZoneView> {
        let t = self.last_time.unwrap_or(0.0);
        self.zones.iter().map(|z| ZoneView::from_zone(z, t)).collect()
    }
}
