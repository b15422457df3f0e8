//! Twitter 渠道（POST /2/tweets，OAuth 1.0a 用户上下文签名）

use crate::notification::channel::Notifier;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::blocking::Client;
use serde::Serialize;
use sha1::Sha1;
use std::time::Duration;
use tracing::info;

type HmacSha1 = Hmac<Sha1>;

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

/// Twitter 凭据
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    /// 超时时间（秒）
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct TweetPayload<'a> {
    text: &'a str,
}

pub struct TwitterNotifier {
    client: Client,
    config: TwitterConfig,
}

impl TwitterNotifier {
    pub fn new(config: TwitterConfig) -> Result<Self> {
        let required = [
            ("consumer_key", &config.consumer_key),
            ("consumer_secret", &config.consumer_secret),
            ("access_token", &config.access_token),
            ("access_token_secret", &config.access_token_secret),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(anyhow!("twitter {} is required", field));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// 生成 `Authorization` 头
    fn authorization_header(&self, method: &str, url: &str) -> Result<String> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params = vec![
            ("oauth_consumer_key".to_string(), self.config.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp),
            ("oauth_token".to_string(), self.config.access_token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let signature = oauth_signature(
            method,
            url,
            &params,
            &self.config.consumer_secret,
            &self.config.access_token_secret,
        )?;
        params.push(("oauth_signature".to_string(), signature));
        params.sort();

        let fields: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();

        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

impl Notifier for TwitterNotifier {
    fn name(&self) -> &str {
        "twitter"
    }

    fn notify(&self, message: &str) -> Result<()> {
        let authorization = self.authorization_header("POST", TWEETS_URL)?;

        let response = self
            .client
            .post(TWEETS_URL)
            .header("Authorization", authorization)
            .json(&TweetPayload { text: message })
            .send()
            .context("Twitter request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Twitter rejected status update ({}): {}", status, body));
        }

        info!(channel = "twitter", status = %status, "Notification sent");
        Ok(())
    }
}

/// RFC 3986 百分号编码（OAuth 1.0a 要求的形式）
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// 计算 OAuth 1.0a HMAC-SHA1 签名
///
/// `params` 包含所有参与签名的参数（oauth_* 以及 query/form 参数），未编码。
pub fn oauth_signature(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| anyhow!("Invalid signing key: {}", e))?;
    mac.update(base.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
