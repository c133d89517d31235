// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 帧时钟 (Frame Clock)
//! 帧序号 → 单调时间戳 (秒)

use tracing::warn;

use crate::error::{Error, Result};

/// 视频源未报告帧率时使用的默认值
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frame_rate: f64,
}

impl FrameClock {
    /// 固定帧率创建时钟
    pub fn new(frame_rate: f64) -> Result<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(Error::InvalidFrameRate(frame_rate));
        }
        Ok(Self { frame_rate })
    }

    /// 使用视频源报告的帧率,缺失或无效 (0, NaN) 时回退到 `fallback`
    pub fn from_reported(reported: Option<f64>, fallback: f64) -> Result<Self> {
        match reported {
            Some(fps) if fps.is_finite() && fps > 0.0 => Self::new(fps),
            other => {
                warn!(
                    "⚠️ 视频源帧率无效 ({:?}), 使用默认值 {:.1} fps",
                    other, fallback
                );
                Self::new(fallback)
            }
        }
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// 帧间隔 (秒)
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.frame_rate
    }

    pub fn timestamp(&self, frame_index: u64) -> f64 {
        timestamp(frame_index, self.frame_rate)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

/// `frame_index / frame_rate`
pub fn timestamp(frame_index: u64, frame_rate: f64) -> f64 {
    frame_index as f64 / frame_rate
}
