//! 通知限流模块 - 同一场降雨只通知一次

use crate::event::Event;
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::debug;

/// 默认限流窗口（30 分钟）
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30 * 60);

/// 限流器状态（只读视图）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// 没有进行中的降雨通知
    Idle,
    /// 已通知，处于冷却期
    Cooling { since: DateTime<Local> },
}

/// 通知限流器
///
/// 状态机：
/// - `Idle` 收到事件：放行，进入 `Cooling { since: t }`
/// - `Cooling` 且 `t > since + window`：重置为 `Idle`，本次不放行
/// - `Cooling` 其他情况：不放行
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    /// 最近一次放行的事件时间
    last_notified_at: Option<DateTime<Local>>,
    /// 冷却窗口
    window: Duration,
}

impl ThrottleGate {
    /// 创建新的限流器
    pub fn new(window: Duration) -> Self {
        Self {
            last_notified_at: None,
            window,
        }
    }

    /// 当前状态
    pub fn state(&self) -> GateState {
        match self.last_notified_at {
            None => GateState::Idle,
            Some(since) => GateState::Cooling { since },
        }
    }

    /// 判断事件是否应该触发通知，同时推进状态
    pub fn admit(&mut self, event: &Event) -> bool {
        let t = event.timestamp();

        let Some(since) = self.last_notified_at else {
            self.last_notified_at = Some(t);
            debug!(at = %t, "Throttle gate admitted event, cooling started");
            return true;
        };

        if self.gap_exceeds_window(since, t) {
            // 触发重置的事件只作为边界，不放行
            self.last_notified_at = None;
            debug!(since = %since, at = %t, "Throttle window elapsed, gate re-armed");
        } else {
            debug!(since = %since, at = %t, "Throttle gate suppressed event");
        }

        false
    }

    /// `t` 早于 `since` 时视为仍在窗口内
    fn gap_exceeds_window(&self, since: DateTime<Local>, t: DateTime<Local>) -> bool {
        match (t - since).to_std() {
            Ok(gap) => gap > self.window,
            Err(_) => false,
        }
    }
}

impl Default for ThrottleGate {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn rain_at(base: DateTime<Local>, minutes: i64) -> Event {
        Event::rain(base + ChronoDuration::minutes(minutes))
    }

    #[test]
    fn test_first_event_is_admitted() {
        let mut gate = ThrottleGate::new(Duration::from_secs(60));
        let base = Local::now();

        assert_eq!(gate.state(), GateState::Idle);
        assert!(gate.admit(&rain_at(base, 0)));
        assert_eq!(gate.state(), GateState::Cooling { since: base });
    }

    #[test]
    fn test_events_within_window_are_suppressed() {
        let mut gate = ThrottleGate::new(Duration::from_secs(30 * 60));
        let base = Local::now();

        assert!(gate.admit(&rain_at(base, 0)));
        for minutes in [5, 10, 20, 30] {
            assert!(!gate.admit(&rain_at(base, minutes)));
        }
        // 窗口内的事件不会移动冷却起点
        assert_eq!(gate.state(), GateState::Cooling { since: base });
    }

    #[test]
    fn test_exact_window_boundary_is_still_suppressed() {
        let mut gate = ThrottleGate::new(Duration::from_secs(30 * 60));
        let base = Local::now();

        assert!(gate.admit(&rain_at(base, 0)));
        assert!(!gate.admit(&rain_at(base, 30)));
        assert!(matches!(gate.state(), GateState::Cooling { .. }));
    }

    #[test]
    fn test_gap_beyond_window_resets_without_admitting() {
        let mut gate = ThrottleGate::new(Duration::from_secs(30 * 60));
        let base = Local::now();

        assert!(gate.admit(&rain_at(base, 0)));
        assert!(!gate.admit(&rain_at(base, 31)));
        assert_eq!(gate.state(), GateState::Idle);

        assert!(gate.admit(&rain_at(base, 32)));
        assert_eq!(
            gate.state(),
            GateState::Cooling { since: base + ChronoDuration::minutes(32) }
        );
    }

    #[test]
    fn test_out_of_order_event_counts_as_inside_window() {
        let mut gate = ThrottleGate::new(Duration::from_secs(60));
        let base = Local::now();

        assert!(gate.admit(&rain_at(base, 10)));
        assert!(!gate.admit(&rain_at(base, 0)));
        assert_eq!(
            gate.state(),
            GateState::Cooling { since: base + ChronoDuration::minutes(10) }
        );
    }
}
