// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 检测与跟踪 (Detection & Tracking)
///
/// - Types:   检测框与几何类型
/// - Tracker: 最近质心多目标跟踪
pub mod tracker;
pub mod types;

pub use tracker::{CentroidTracker, MatchSet, Track, TrackId, Tracker};
pub use types::{BBox, Detection, Point2};
