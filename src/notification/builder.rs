//! 渠道构建 - 启动时根据配置选择唯一的通知渠道

use super::channel::{Notifier, NotifierKind};
use super::channels::{
    NoopNotifier, SlackConfig, SlackNotifier, TwitterConfig, TwitterNotifier, WebhookConfig,
    WebhookNotifier,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// 渠道配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// 渠道类型
    pub service: NotifierKind,
    pub slack_token: Option<String>,
    pub slack_channel: Option<String>,
    /// Slack API 地址，未设置时使用官方 chat.postMessage
    pub slack_endpoint: Option<String>,
    pub twitter_consumer_key: Option<String>,
    pub twitter_consumer_secret: Option<String>,
    pub twitter_access_token: Option<String>,
    pub twitter_access_token_secret: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            service: NotifierKind::None,
            slack_token: None,
            slack_channel: None,
            slack_endpoint: None,
            twitter_consumer_key: None,
            twitter_consumer_secret: None,
            twitter_access_token: None,
            twitter_access_token_secret: None,
            webhook_url: None,
            webhook_token: None,
            timeout_secs: 30,
        }
    }
}

fn value(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

/// 构建通知渠道
///
/// 凭据缺失时立即返回错误，不会进入轮询循环。
pub fn build_notifier(config: &NotifierConfig) -> Result<Box<dyn Notifier>> {
    let notifier: Box<dyn Notifier> = match config.service {
        NotifierKind::None => Box::new(NoopNotifier),
        NotifierKind::Slack => {
            let mut slack = SlackNotifier::new(SlackConfig {
                token: value(&config.slack_token),
                channel: value(&config.slack_channel),
                timeout_secs: config.timeout_secs,
            })
            .context("Invalid slack configuration")?;
            if let Some(endpoint) = config.slack_endpoint.as_deref().filter(|e| !e.is_empty()) {
                slack = slack.with_endpoint(endpoint);
            }
            Box::new(slack)
        }
        NotifierKind::Twitter => Box::new(
            TwitterNotifier::new(TwitterConfig {
                consumer_key: value(&config.twitter_consumer_key),
                consumer_secret: value(&config.twitter_consumer_secret),
                access_token: value(&config.twitter_access_token),
                access_token_secret: value(&config.twitter_access_token_secret),
                timeout_secs: config.timeout_secs,
            })
            .context("Invalid twitter configuration")?,
        ),
        NotifierKind::Webhook => Box::new(
            WebhookNotifier::new(WebhookConfig {
                url: value(&config.webhook_url),
                token: config.webhook_token.clone(),
                timeout_secs: config.timeout_secs,
            })
            .context("Invalid webhook configuration")?,
        ),
    };

    info!(channel = notifier.name(), "Notification channel selected");
    Ok(notifier)
}
