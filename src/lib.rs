// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod clock; // 帧时钟
pub mod config; // 引擎配置参数
pub mod detection; // 检测框与目标跟踪
pub mod error;
pub mod input; // 检测流输入
pub mod occupancy; // 区域占用计时
pub mod pipeline; // 逐帧流水线
pub mod report; // 输出快照

pub use crate::clock::FrameClock;
pub use crate::config::{AppConfig, EngineConfig, InputConfig};
pub use crate::detection::{BBox, CentroidTracker, Detection, Point2, Track, TrackId, Tracker};
pub use crate::error::{Error, Result};
pub use crate::occupancy::{OccupancyAccumulator, Zone, ZoneId};
pub use crate::pipeline::{EngineWorker, FrameInput, OccupancyEngine};
pub use crate::report::{OccupancySummary, Snapshot, TrackView, ZoneView};
