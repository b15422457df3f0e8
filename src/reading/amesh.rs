//! 东京アメッシュ读数来源
//!
//! アメッシュ每 5 分钟发布一张降雨 mesh 图（透明 GIF 叠加层）。
//! 没有降雨时叠加层几乎全透明，压缩后体积很小，因此按响应体大小判断是否下雨。

use super::{Reading, ReadingSource};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Local, TimeZone, Timelike};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 默认站点
pub const DEFAULT_BASE_URL: &str = "http://tokyo-ame.jwa.or.jp";

/// 快照发布间隔（分钟）
const SNAPSHOT_INTERVAL_MINUTES: u32 = 5;

/// 发布延迟（分钟），避免请求到尚未生成的快照
const PUBLISH_LAG_MINUTES: i64 = 1;

/// 快照文件名使用日本标准时间（UTC+9）
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// 读数来源配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AmeshSourceConfig {
    /// 站点地址
    pub base_url: String,
    /// 判定为降雨的最小 mesh 图大小（字节）
    pub min_rain_bytes: usize,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for AmeshSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_rain_bytes: 1024,
            timeout_secs: 30,
        }
    }
}

/// 某一时刻对应的快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmeshEntry {
    /// 快照时间（5 分钟对齐）
    pub timestamp: DateTime<Local>,
    /// 页面地址
    pub page_url: String,
    /// 降雨 mesh 图地址
    pub mesh_url: String,
}

impl AmeshEntry {
    /// 计算 `now` 时刻可用的最新快照
    ///
    /// 文件名按 JST 生成，与运行主机的时区无关。
    pub fn at<Tz: TimeZone>(now: DateTime<Tz>, base_url: &str) -> Result<Self> {
        let jst = FixedOffset::east_opt(JST_OFFSET_SECS)
            .ok_or_else(|| anyhow!("invalid JST offset"))?;
        let lagged = now.with_timezone(&jst) - ChronoDuration::minutes(PUBLISH_LAG_MINUTES);
        let minute = lagged.minute() - lagged.minute() % SNAPSHOT_INTERVAL_MINUTES;
        let snapshot = lagged
            .with_minute(minute)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .ok_or_else(|| anyhow!("cannot align {} to a snapshot boundary", lagged))?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            timestamp: snapshot.with_timezone(&Local),
            page_url: format!("{}/", base),
            mesh_url: format!("{}/mesh/000/{}.gif", base, snapshot.format("%Y%m%d%H%M")),
        })
    }
}

/// アメッシュ读数来源
pub struct AmeshSource {
    client: Client,
    config: AmeshSourceConfig,
}

impl AmeshSource {
    /// 创建读数来源
    pub fn new(config: AmeshSourceConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(anyhow!("source base_url is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// 当前快照
    pub fn current_entry(&self) -> Result<AmeshEntry> {
        AmeshEntry::at(Local::now(), &self.config.base_url)
    }

    /// 根据 mesh 图大小判断是否下雨
    pub fn classify(&self, mesh_bytes: usize) -> bool {
        mesh_bytes >= self.config.min_rain_bytes
    }
}

impl ReadingSource for AmeshSource {
    fn fetch_current_reading(&self) -> Result<Reading> {
        let entry = self.current_entry()?;

        let response = self
            .client
            .get(&entry.mesh_url)
            .send()
            .with_context(|| format!("HTTP request failed: {}", entry.mesh_url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("mesh image {} returned {}", entry.mesh_url, status));
        }

        let body = response
            .bytes()
            .with_context(|| format!("Failed to read mesh image: {}", entry.mesh_url))?;
        let is_raining = self.classify(body.len());

        debug!(
            url = %entry.mesh_url,
            bytes = body.len(),
            is_raining,
            "Fetched mesh image"
        );

        Ok(Reading::new(entry.timestamp, is_raining).with_url(entry.page_url))
    }
}
