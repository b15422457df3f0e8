//! Slack 渠道（chat.postMessage）

use crate::notification::channel::Notifier;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Slack 渠道配置
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token
    pub token: String,
    /// 频道 ID 或名称
    pub channel: String,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct PostMessagePayload<'a> {
    channel: &'a str,
    text: &'a str,
}

/// chat.postMessage 响应（HTTP 200 也可能是失败）
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackNotifier {
    client: Client,
    config: SlackConfig,
    endpoint: String,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(anyhow!("slack token is required"));
        }
        if config.channel.is_empty() {
            return Err(anyhow!("slack channel is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config,
            endpoint: POST_MESSAGE_URL.to_string(),
        })
    }

    /// 指定 API 地址（用于自建网关或代理）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    fn notify(&self, message: &str) -> Result<()> {
        let payload = PostMessagePayload {
            channel: &self.config.channel,
            text: message,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send()
            .context("Slack request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Slack returned {}: {}", status, body));
        }

        let response: PostMessageResponse =
            response.json().context("Failed to parse Slack response")?;

        if !response.ok {
            return Err(anyhow!(
                "Slack rejected message: {}",
                response.error.unwrap_or_else(|| "unknown error".to_string())
            ));
        }

        info!(channel = "slack", target = %self.config.channel, "Notification sent");
        Ok(())
    }
}
