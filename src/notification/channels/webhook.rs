//! 通用 Webhook 渠道
//!
//! 以 JSON `{"text": ...}` POST 到指定地址，兼容 Slack/Mattermost incoming webhook。

use crate::notification::channel::Notifier;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Webhook 配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 目标地址
    pub url: String,
    /// Bearer token（可选）
    pub token: Option<String>,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Webhook 请求载荷
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub text: &'a str,
}

#[derive(Debug)]
pub struct WebhookNotifier {
    client: Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(anyhow!("webhook url is required"));
        }
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(anyhow!("webhook url must be http(s): {}", config.url));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn notify(&self, message: &str) -> Result<()> {
        let mut request = self
            .client
            .post(&self.config.url)
            .json(&WebhookPayload { text: message });

        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().context("Webhook request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Webhook rejected message ({}): {}", status, body));
        }

        info!(channel = "webhook", status = %status, "Notification sent");
        Ok(())
    }
}
