//! 答题计时器 - 基础设施层
//!
//! 持有唯一的周期任务，只暴露"已用时"的读取能力

use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// 答题计时器
///
/// 职责：
/// - 按固定间隔刷新已用秒数
/// - 不认识题目 / 成绩
/// - 答题结束时必须 stop()，drop 时也会自动停止
pub struct SessionTimer {
    handle: Option<JoinHandle<()>>,
    elapsed_rx: watch::Receiver<u64>,
}

impl SessionTimer {
    /// 启动计时器
    ///
    /// # 参数
    /// - `started_at`: 计时起点
    /// - `tick`: 刷新间隔
    pub fn start(started_at: DateTime<Local>, tick: Duration) -> Self {
        let (elapsed_tx, elapsed_rx) = watch::channel(0u64);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let elapsed = (Local::now() - started_at).num_seconds().max(0) as u64;
                if elapsed_tx.send(elapsed).is_err() {
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
            elapsed_rx,
        }
    }

    /// 最近一次刷新的已用秒数
    pub fn elapsed_seconds(&self) -> u64 {
        *self.elapsed_rx.borrow()
    }

    /// 订阅刷新事件
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 停止计时器，可重复调用
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("计时器已停止");
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
