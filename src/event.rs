//! 事件模型 - Poller 产生、Observer 分发的领域事件

use chrono::{DateTime, Local};
use std::fmt;

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// 雷达检测到降雨
    Rain,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Rain => write!(f, "rain"),
        }
    }
}

/// 领域事件
///
/// 创建后不可变，handler 只拿到 `&Event`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    timestamp: DateTime<Local>,
}

impl Event {
    pub fn new(kind: EventKind, timestamp: DateTime<Local>) -> Self {
        Self { kind, timestamp }
    }

    /// 创建降雨事件
    pub fn rain(timestamp: DateTime<Local>) -> Self {
        Self::new(EventKind::Rain, timestamp)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// 事件时间戳（来自 Reading，而非分发时刻）
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}
