// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 错误类型 (Error types)
//!
//! 引擎内部没有致命错误,只有调用方违约 (时间戳倒退、非法参数) 与边界 I/O 错误。

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 时间戳倒退: 帧必须按非递减时间顺序送入
    #[error("timestamp went backwards: previous {previous:.3}s, got {current:.3}s")]
    NonMonotonicTimestamp { previous: f64, current: f64 },

    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 检测流某一行解析失败 (行号从1开始)
    #[error("malformed detection record at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("engine worker disconnected")]
    WorkerDisconnected,
}
