//! 配置加载
//!
//! 优先级：默认值 < JSON 配置文件 < 环境变量 < 命令行参数。
//! 配置文件默认位于 `<config_dir>/amesh/config.json`，不存在时跳过。

use crate::notification::NotifierConfig;
use crate::reading::AmeshSourceConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 运行配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 轮询间隔（秒）
    pub interval_secs: u64,
    /// 限流窗口（秒）
    pub throttle_window_secs: u64,
    /// 通知中要 @ 的用户
    pub users: Vec<String>,
    pub notifier: NotifierConfig,
    pub source: AmeshSourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            throttle_window_secs: 1800,
            users: Vec::new(),
            notifier: NotifierConfig::default(),
            source: AmeshSourceConfig::default(),
        }
    }
}

impl Config {
    /// 加载配置（文件 + 进程环境变量）
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, &env)
    }

    /// 加载配置，环境变量由调用方提供（便于测试）
    pub fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(env)?;
        Ok(config)
    }

    /// 读取 JSON 配置文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// 用 `AMESH_*` 环境变量覆盖
    pub fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<()> {
        let get = |key: &str| env.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("AMESH_INTERVAL_SECS") {
            self.interval_secs = v
                .parse()
                .with_context(|| format!("AMESH_INTERVAL_SECS is not a number: {}", v))?;
        }
        if let Some(v) = get("AMESH_THROTTLE_WINDOW_SECS") {
            self.throttle_window_secs = v
                .parse()
                .with_context(|| format!("AMESH_THROTTLE_WINDOW_SECS is not a number: {}", v))?;
        }
        if let Some(v) = get("AMESH_NOTIFICATION_SERVICE") {
            self.notifier.service = v.parse()?;
        }
        if let Some(v) = get("AMESH_NOTIFICATION_USERS") {
            self.users = parse_users(&v);
        }
        if let Some(v) = get("AMESH_MIN_RAIN_BYTES") {
            self.source.min_rain_bytes = v
                .parse()
                .with_context(|| format!("AMESH_MIN_RAIN_BYTES is not a number: {}", v))?;
        }
        if let Some(v) = get("AMESH_BASE_URL") {
            self.source.base_url = v;
        }

        let credentials: [(&str, &mut Option<String>); 9] = [
            ("AMESH_SLACK_TOKEN", &mut self.notifier.slack_token),
            ("AMESH_SLACK_CHANNEL", &mut self.notifier.slack_channel),
            ("AMESH_SLACK_ENDPOINT", &mut self.notifier.slack_endpoint),
            ("AMESH_TWITTER_CONSUMER_KEY", &mut self.notifier.twitter_consumer_key),
            ("AMESH_TWITTER_CONSUMER_SECRET", &mut self.notifier.twitter_consumer_secret),
            ("AMESH_TWITTER_ACCESS_TOKEN", &mut self.notifier.twitter_access_token),
            ("AMESH_TWITTER_ACCESS_TOKEN_SECRET", &mut self.notifier.twitter_access_token_secret),
            ("AMESH_WEBHOOK_URL", &mut self.notifier.webhook_url),
            ("AMESH_WEBHOOK_TOKEN", &mut self.notifier.webhook_token),
        ];
        for (key, slot) in credentials {
            if let Some(v) = get(key) {
                *slot = Some(v);
            }
        }

        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("interval must be greater than zero");
        }
        if self.throttle_window_secs == 0 {
            bail!("throttle window must be greater than zero");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_secs(self.throttle_window_secs)
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("amesh").join("config.json"))
}

/// 解析逗号分隔的用户列表
pub fn parse_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect()
}
