//! 空渠道（不发送任何消息）

use crate::notification::channel::Notifier;
use anyhow::Result;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn name(&self) -> &str {
        "none"
    }

    fn notify(&self, message: &str) -> Result<()> {
        debug!(channel = "none", len = message.len(), "Notification discarded");
        Ok(())
    }
}
