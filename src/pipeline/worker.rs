// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 引擎工作线程
//! 职责: 接收 FrameInput → 引擎逐帧处理 → 按顺序发送快照
//!
//! 引擎由工作线程独占,所有访问都经过同一个逐帧入口,不需要加锁。

use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use super::{EngineCommand, EngineEvent, FrameInput, OccupancyEngine};
use crate::detection::tracker::Tracker;
use crate::error::{Error, Result};
use crate::report::OccupancySummary;

pub struct EngineWorker {
    tx_command: Sender<EngineCommand>,
    rx_event: Receiver<EngineEvent>,
    handle: JoinHandle<()>,
}

impl EngineWorker {
    /// 启动工作线程; `capacity` 为输入队列长度 (满时 submit 阻塞)
    pub fn spawn<T>(engine: OccupancyEngine<T>, capacity: usize) -> Self
    where
        T: Tracker + Send + 'static,
    {
        let (tx_command, rx_command) = crossbeam_channel::bounded(capacity);
        let (tx_event, rx_event) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || {
            run_engine(engine, rx_command, tx_event);
        });

        Self {
            tx_command,
            rx_event,
            handle,
        }
    }

    /// 提交一帧
    pub fn submit(&self, input: FrameInput) -> Result<()> {
        self.tx_command
            .send(EngineCommand::Frame(input))
            .map_err(|_| Error::WorkerDisconnected)
    }

    /// 已产生的事件 (快照按帧顺序)
    pub fn events(&self) -> &Receiver<EngineEvent> {
        &self.rx_event
    }

    /// 结束输入: 返回尚未取走的事件与最终汇总
    pub fn finish(self) -> Result<(Vec<EngineEvent>, OccupancySummary)> {
        self.tx_command
            .send(EngineCommand::Finish)
            .map_err(|_| Error::WorkerDisconnected)?;

        let mut pending = Vec::new();
        let mut summary = None;
        while let Ok(event) = self.rx_event.recv() {
            match event {
                EngineEvent::Finished(s) => summary = Some(s),
                other => pending.push(other),
            }
        }

        self.handle.join().map_err(|_| Error::WorkerDisconnected)?;
        summary
            .map(|s| (pending, s))
            .ok_or(Error::WorkerDisconnected)
    }
}

fn run_engine<T: Tracker>(
    mut engine: OccupancyEngine<T>,
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineEvent>,
) {
    info!("🔍 引擎线程启动");

    while let Ok(command) = rx.recv() {
        match command {
            EngineCommand::Frame(input) => {
                let event = match engine.process(&input) {
                    Ok(snapshot) => EngineEvent::Snapshot(snapshot),
                    Err(error) => {
                        warn!("⚠️ 帧 {} 被拒绝: {}", input.frame_index, error);
                        EngineEvent::Rejected {
                            frame_index: input.frame_index,
                            error,
                        }
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            EngineCommand::Finish => {
                let summary = engine.finalize();
                let _ = tx.send(EngineEvent::Finished(summary));
                break;
            }
        }
    }

    info!("🛑 引擎线程退出 (共处理 {} 帧)", engine.frames_processed());
}
