//! 雷达读数 - Poller 从 ReadingSource 拉取的观测值

pub mod amesh;

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

pub use amesh::{AmeshEntry, AmeshSource, AmeshSourceConfig};

/// 一次观测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    /// 雷达快照时间
    pub timestamp: DateTime<Local>,
    /// 是否检测到降雨
    pub is_raining: bool,
    /// 快照地址（可选，仅用于日志和展示）
    pub url: Option<String>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Local>, is_raining: bool) -> Self {
        Self {
            timestamp,
            is_raining,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// 读数来源
pub trait ReadingSource: Send {
    /// 获取最新读数
    fn fetch_current_reading(&self) -> Result<Reading>;
}
