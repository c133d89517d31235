// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 检测输入系统 (Detection Input System)
///
/// 外部检测器与引擎之间的边界适配
/// - Reader: JSON Lines 检测流读取 (每行一帧)
/// - Filter: 类别/置信度过滤 (只保留人员)
pub mod filter;
pub mod reader;

pub use filter::DetectionFilter;
pub use reader::{DetectionRecord, FrameReader, FrameRecord};
