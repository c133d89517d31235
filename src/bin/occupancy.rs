// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 座位占用分析 (Seat Occupancy Analysis)
///
/// 系统架构:
/// 1. 主线程:   读取检测流 (JSON Lines) → 人员过滤 → 提交帧
/// 2. 引擎线程: 跟踪 + 区域占用计时
/// 3. 主线程:   写出每帧快照与最终汇总
///
/// 直接运行: cargo run --bin occupancy -- --zones zones.json --detections dets.jsonl
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use seat_occupancy_rs::config::{load_zones, AppConfig};
use seat_occupancy_rs::input::{DetectionFilter, FrameReader};
use seat_occupancy_rs::pipeline::{EngineEvent, EngineWorker, FrameInput, OccupancyEngine};

/// 座位占用分析参数
#[derive(Parser, Debug)]
#[command(author, version, about = "座位占用分析 - 人员跟踪与区域占用计时", long_about = None)]
struct Args {
    /// 区域 (座位) 文件: [[x1, y1, x2, y2], ...]
    #[arg(short, long)]
    zones: PathBuf,

    /// 检测流文件 (JSON Lines, 每行一帧)
    #[arg(short, long)]
    detections: PathBuf,

    /// 配置文件 (不存在时自动创建)
    #[arg(short, long, default_value = "occupancy.json")]
    config: PathBuf,

    /// 视频帧率 (缺省使用配置中的默认帧率)
    #[arg(long)]
    fps: Option<f64>,

    /// 每帧快照输出 (JSON Lines)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 最终汇总输出 (JSON)
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// 输入队列长度
    #[arg(long, default_value_t = 60)]
    queue: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seat_occupancy_rs=info,occupancy=info")),
        )
        .init();

    let args = Args::parse();

    info!("🚀 座位占用分析启动");
    let config = AppConfig::load_or_default(&args.config);
    config.print_summary();

    let zones = load_zones(&args.zones)
        .with_context(|| format!("failed to load zones from {}", args.zones.display()))?;
    info!("🪑 座位总数: {}", zones.len());

    let engine = OccupancyEngine::new(&config.engine, zones, args.fps)?;
    let worker = EngineWorker::spawn(engine, args.queue.max(1));

    let mut output = match &args.output {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => None,
    };

    let reader = FrameReader::open(&args.detections)
        .with_context(|| format!("failed to open {}", args.detections.display()))?;
    let mut filter = DetectionFilter::new(&config.input);

    info!("📹 检测流处理中...");
    for record in reader {
        let record = record.context("failed to read detection stream")?;
        let detections = filter.apply(&record.detections);
        worker.submit(FrameInput {
            frame_index: record.frame,
            detections,
        })?;

        for event in worker.events().try_iter() {
            handle_event(event, output.as_mut())?;
        }
    }

    let (pending, summary) = worker.finish()?;
    for event in pending {
        handle_event(event, output.as_mut())?;
    }
    if let Some(out) = output.as_mut() {
        out.flush()?;
    }

    info!(
        "✅ 检测过滤: 保留 {} / 丢弃 {}",
        filter.kept, filter.dropped
    );
    summary.print_summary();

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        info!("💾 汇总已保存到 {}", path.display());
    }

    info!("✅ 完成");
    Ok(())
}

fn handle_event(event: EngineEvent, output: Option<&mut BufWriter<File>>) -> Result<()> {
    match event {
        EngineEvent::Snapshot(snapshot) => {
            if let Some(out) = output {
                serde_json::to_writer(&mut *out, &snapshot)?;
                out.write_all(b"\n")?;
            }
            Ok(())
        }
        EngineEvent::Rejected { frame_index, error } => {
            Err(anyhow::Error::new(error).context(format!("frame {} rejected", frame_index)))
        }
        EngineEvent::Finished(_) => Ok(()),
    }
}
