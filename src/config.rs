// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 引擎配置 - 通过JSON文件调整参数
//!
//! 参数在引擎构造时固定,运行期不可修改。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clock::DEFAULT_FRAME_RATE;
use crate::detection::tracker::{DEFAULT_MAX_DIST, DEFAULT_MAX_MISS_TIME};
use crate::detection::types::{BBox, PERSON_CLASS_ID};
use crate::error::Result;

/// 跟踪与计时参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_dist: f32,           // 最大匹配距离 (像素)
    pub max_miss_time: f64,      // 最大丢失时间 (秒)
    pub default_frame_rate: f64, // 视频源无帧率时的默认值
    pub first_frame_index: u64,  // 第一帧的帧序号 (0 或 1, 全程一致)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dist: DEFAULT_MAX_DIST,
            max_miss_time: DEFAULT_MAX_MISS_TIME,
            default_frame_rate: DEFAULT_FRAME_RATE,
            first_frame_index: 1,
        }
    }
}

/// 检测器输入过滤参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub person_class_id: u32, // 人员类别ID
    pub min_confidence: f32,  // 置信度下限
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            person_class_id: PERSON_CLASS_ID,
            min_confidence: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// 从JSON文件加载 (严格模式)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// 从JSON文件加载; 文件不存在时写入默认配置,解析失败时使用默认值
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("📝 配置文件不存在,创建默认配置: {}", path.display());
            let config = Self::default();
            if let Err(e) = config.save(path) {
                warn!("❌ 保存默认配置失败: {}", e);
            }
            return config;
        }

        match Self::load(path) {
            Ok(config) => {
                info!("✅ 配置已从 {} 加载", path.display());
                config
            }
            Err(e) => {
                warn!("⚠️ 配置文件解析失败: {}, 使用默认值", e);
                Self::default()
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        info!(
            "🎛️ 当前配置: 最大匹配距离 {:.0}px, 最大丢失时间 {:.2}s, 默认帧率 {:.1}, 人员类别 {}, 置信度下限 {:.2}",
            self.engine.max_dist,
            self.engine.max_miss_time,
            self.engine.default_frame_rate,
            self.input.person_class_id,
            self.input.min_confidence
        );
    }
}

// ========== 区域 (座位) 文件 ==========

/// 加载区域列表: `[[x1, y1, x2, y2], ...]`, 角点按轴排序
pub fn load_zones(path: impl AsRef<Path>) -> Result<Vec<BBox>> {
    let json = fs::read_to_string(path)?;
    let rects: Vec<[f32; 4]> = serde_json::from_str(&json)?;
    Ok(rects
        .into_iter()
        .map(|r| BBox::from(r).normalized())
        .collect())
}

pub fn save_zones(path: impl AsRef<Path>, zones: &[BBox]) -> Result<()> {
    let rects: Vec<[f32; 4]> = zones.iter().map(BBox::to_array).collect();
    fs::write(path, serde_json::to_string_pretty(&rects)?)?;
    Ok(())
}
