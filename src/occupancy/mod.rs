// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 区域占用系统 (Zone Occupancy System)
///
/// - Zone:        静态区域 + 单区域占用状态
/// - Accumulator: 每帧占用判定与时长累计
pub mod accumulator;
pub mod zone;

pub use accumulator::OccupancyAccumulator;
pub use zone::{Edge, Zone, ZoneId};
