// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 检测与几何数据结构定义
//! Data structures for detections and geometry

use serde::{Deserialize, Serialize};

// ========== 公共常量 ==========

/// COCO "person" 类别ID
pub const PERSON_CLASS_ID: u32 = 0;

// ========== 数据结构 ==========

/// 二维点 (像素坐标)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 欧氏距离
    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 轴对齐矩形框 (x1, y1, x2, y2)
///
/// 不做几何校验: x1 > x2 之类的退化框原样保留。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 中心点
    pub fn center(&self) -> Point2 {
        Point2::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// 点是否在框内 (四条边均包含)
    pub fn contains(&self, p: &Point2) -> bool {
        self.x1 <= p.x && p.x <= self.x2 && self.y1 <= p.y && p.y <= self.y2
    }

    /// 角点排序,保证 x1 <= x2, y1 <= y2 (用于拖拽画出的区域)
    pub fn normalized(&self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// 检测结果 (检测器 → 跟踪器)
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBox,
    /// 框中心,创建时计算一次
    pub center: Point2,
    pub confidence: f32,
    pub class_id: u32,
}

impl Detection {
    /// 人员检测框
    pub fn new(bbox: BBox) -> Self {
        Self::with_class(bbox, PERSON_CLASS_ID, 1.0)
    }

    pub fn with_class(bbox: BBox, class_id: u32, confidence: f32) -> Self {
        Self {
            center: bbox.center(),
            bbox,
            confidence,
            class_id,
        }
    }
}

impl From<BBox> for Detection {
    fn from(bbox: BBox) -> Self {
        Self::new(bbox)
    }
}
