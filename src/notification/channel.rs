//! 通知渠道 trait 定义

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 通知渠道
///
/// `notify` 是同步调用：要么消息被目标接收，要么返回错误。
/// 这一层不做重试。
pub trait Notifier: Send {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 发送一条纯文本消息
    fn notify(&self, message: &str) -> Result<()>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn notify(&self, message: &str) -> Result<()> {
        (**self).notify(message)
    }
}

/// 渠道类型（启动时由配置选择）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// 不发送
    #[default]
    None,
    Slack,
    Twitter,
    Webhook,
}

impl NotifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifierKind::None => "none",
            NotifierKind::Slack => "slack",
            NotifierKind::Twitter => "twitter",
            NotifierKind::Webhook => "webhook",
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(NotifierKind::None),
            "slack" => Ok(NotifierKind::Slack),
            "twitter" => Ok(NotifierKind::Twitter),
            "webhook" => Ok(NotifierKind::Webhook),
            other => Err(anyhow!(
                "unknown notification service: {}，可选: none, slack, twitter, webhook",
                other
            )),
        }
    }
}
