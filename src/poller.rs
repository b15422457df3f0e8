//! 轮询循环 - 定时拉取读数，下雨时生成事件并分发

use crate::event::Event;
use crate::observer::{DispatchSummary, Observer};
use crate::reading::ReadingSource;
use crossbeam_channel::{select, tick, Receiver, TryRecvError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 默认轮询间隔（5 分钟，与快照发布周期一致）
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// 单次轮询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// 检测到降雨并已分发
    Dispatched(DispatchSummary),
    /// 没有降雨
    Clear,
    /// 获取读数失败，本次跳过
    FetchFailed(String),
}

/// 运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub events: u64,
    pub fetch_failures: u64,
}

impl PollStats {
    fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        match outcome {
            TickOutcome::Dispatched(_) => self.events += 1,
            TickOutcome::Clear => {}
            TickOutcome::FetchFailed(_) => self.fetch_failures += 1,
        }
    }
}

/// 轮询器
///
/// 独占读数来源和 Observer，事件的分发与产生在同一个线程上串行执行。
pub struct Poller<S: ReadingSource> {
    source: S,
    observer: Observer,
}

impl<S: ReadingSource> Poller<S> {
    pub fn new(source: S, observer: Observer) -> Self {
        Self { source, observer }
    }

    /// 轮询一次
    pub fn poll_once(&mut self) -> TickOutcome {
        let reading = match self.source.fetch_current_reading() {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Failed to fetch reading, skipping tick");
                return TickOutcome::FetchFailed(e.to_string());
            }
        };

        if !reading.is_raining {
            debug!(at = %reading.timestamp, "No rain");
            return TickOutcome::Clear;
        }

        let event = Event::rain(reading.timestamp);
        let summary = self.observer.dispatch(&event);
        debug!(
            at = %event.timestamp(),
            invoked = summary.invoked,
            failed = summary.failed,
            "Rain event dispatched"
        );
        TickOutcome::Dispatched(summary)
    }

    /// 持续轮询直到收到停止信号
    ///
    /// 启动后立即轮询一次，之后每 `interval` 一次。`stop` 收到消息或发送端
    /// 全部断开都视为停止；观察到停止后不再拉取或分发。
    pub fn run(&mut self, interval: Duration, stop: &Receiver<()>) -> PollStats {
        let mut stats = PollStats::default();
        let ticker = tick(interval);

        info!(interval_secs = interval.as_secs(), "Poller started");

        loop {
            if stop_requested(stop) {
                break;
            }

            let outcome = self.poll_once();
            stats.record(&outcome);

            select! {
                recv(stop) -> _ => break,
                recv(ticker) -> _ => {}
            }
        }

        info!(
            ticks = stats.ticks,
            events = stats.events,
            fetch_failures = stats.fetch_failures,
            "Poller stopped"
        );
        stats
    }
}

fn stop_requested(stop: &Receiver<()>) -> bool {
    match stop.try_recv() {
        Ok(()) | Err(TryRecvError::Disconnected) => true,
        Err(TryRecvError::Empty) => false,
    }
}
