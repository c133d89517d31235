// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 检测过滤器: 检测器原始输出 → 人员检测框
//!
//! 引擎本身不做几何校验,退化框原样放行。

use super::reader::DetectionRecord;
use crate::config::InputConfig;
use crate::detection::types::{BBox, Detection};

#[derive(Debug, Clone)]
pub struct DetectionFilter {
    person_class_id: u32,
    min_confidence: f32,
    pub kept: usize,    // 保留的检测数
    pub dropped: usize, // 过滤掉的检测数
}

impl DetectionFilter {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            person_class_id: config.person_class_id,
            min_confidence: config.min_confidence,
            kept: 0,
            dropped: 0,
        }
    }

    /// 保留人员类别且置信度不低于下限的检测框,保持输入顺序
    pub fn apply(&mut self, records: &[DetectionRecord]) -> Vec<Detection> {
        let detections: Vec<Detection> = records
            .iter()
            .filter(|r| r.class_id == self.person_class_id && r.confidence >= self.min_confidence)
            .map(|r| Detection::with_class(BBox::from(r.bbox), r.class_id, r.confidence))
            .collect();

        self.kept += detections.len();
        self.dropped += records.len() - detections.len();
        detections
    }
}
