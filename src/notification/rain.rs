//! 降雨通知 handler - 组装消息、经过限流后交给通知渠道

use super::channel::Notifier;
use super::formatter::compose_rain_message;
use crate::event::Event;
use crate::reading::amesh::DEFAULT_BASE_URL;
use crate::throttle::{GateState, ThrottleGate};
use anyhow::{Context, Result};
use tracing::info;

/// 降雨通知 handler
///
/// 持有唯一的 [`ThrottleGate`] 和通知渠道，注册到 Observer 后由它独占。
pub struct RainAlert<N: Notifier> {
    notifier: N,
    gate: ThrottleGate,
    mentions: Vec<String>,
    page_url: String,
}

impl<N: Notifier> RainAlert<N> {
    pub fn new(notifier: N, gate: ThrottleGate, mentions: Vec<String>) -> Self {
        Self {
            notifier,
            gate,
            mentions,
            page_url: format!("{}/", DEFAULT_BASE_URL),
        }
    }

    /// 设置消息中的页面地址
    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = page_url.into();
        self
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// 处理降雨事件
    ///
    /// 限流判定先于发送；发送失败不会回滚限流状态。
    pub fn handle(&mut self, event: &Event) -> Result<()> {
        let message = compose_rain_message(&self.mentions, &self.page_url, event);
        let admitted = self.gate.admit(event);

        info!(
            kind = %event.kind(),
            at = %event.timestamp(),
            admitted,
            channel = self.notifier.name(),
            message = %message,
            "[RAIN]"
        );

        if !admitted {
            return Ok(());
        }

        self.notifier
            .notify(&message)
            .with_context(|| format!("{} notification failed", self.notifier.name()))
    }
}
