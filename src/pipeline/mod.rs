// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 占用分析流水线 (Occupancy Pipeline)
///
/// 每帧: 检测框 → 跟踪匹配 → 过期清理 → 区域占用更新 → 快照
/// - Engine: 单线程同步引擎,唯一的逐帧入口
/// - Worker: 独立线程运行引擎,通过通道收发消息
pub mod engine;
pub mod worker;

pub use engine::OccupancyEngine;
pub use worker::EngineWorker;

use crate::detection::types::Detection;
use crate::error::Error;
use crate::report::{OccupancySummary, Snapshot};

// ========== 消息类型定义 ==========

/// 一帧输入 (检测器 → 引擎)
#[derive(Clone, Debug)]
pub struct FrameInput {
    pub frame_index: u64, // 帧序号
    pub detections: Vec<Detection>,
}

/// 引擎命令 (调用方 → 工作线程)
#[derive(Clone, Debug)]
pub enum EngineCommand {
    Frame(FrameInput),
    /// 输入结束: 结算未关闭区间并退出
    Finish,
}

/// 引擎事件 (工作线程 → 调用方)
#[derive(Debug)]
pub enum EngineEvent {
    Snapshot(Snapshot),
    /// 调用方违约 (如帧序倒退), 该帧被丢弃, 引擎状态不变
    Rejected { frame_index: u64, error: Error },
    Finished(OccupancySummary),
}
