// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 检测流读取 (JSON Lines)
//!
//! 每行一帧:
//! `{"frame": 12, "detections": [{"bbox": [x1, y1, x2, y2], "class_id": 0, "confidence": 0.87}]}`
//! 空行忽略。帧必须按帧序号非递减的顺序出现,由引擎负责检查。

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 单个检测记录 (检测器原始输出)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub bbox: [f32; 4],
    #[serde(default)]
    pub class_id: u32,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

/// 单帧记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    #[serde(default)]
    pub detections: Vec<DetectionRecord>,
}

/// 逐行读取检测流
pub struct FrameReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl FrameReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(trimmed).map_err(|source| Error::Parse {
                    line: self.line_no,
                    source,
                }),
            );
        }
    }
}
