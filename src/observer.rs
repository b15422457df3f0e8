//! 事件分发器 - 按事件类型管理 handler 并按注册顺序调用

use crate::event::{Event, EventKind};
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 事件 handler
pub type Handler = Box<dyn FnMut(&Event) -> Result<()> + Send>;

/// 一次分发的结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// 被调用的 handler 数量
    pub invoked: usize,
    /// 返回错误的 handler 数量
    pub failed: usize,
}

/// 事件分发器
///
/// 每个进程只有一个 Observer。handler 在启动时通过 [`Observer::on`] 注册，
/// 之后由 Poller 在同一个循环里调用 [`Observer::dispatch`]。
#[derive(Default)]
pub struct Observer {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl Observer {
    /// 创建新的分发器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 handler（追加到该事件类型的末尾）
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event) -> Result<()> + Send + 'static,
    {
        let list = self.handlers.entry(kind).or_default();
        list.push(Box::new(handler));
        debug!(kind = %kind, position = list.len(), "Registered event handler");
    }

    /// 分发事件
    ///
    /// handler 的错误只记录日志，不影响后续 handler。
    pub fn dispatch(&mut self, event: &Event) -> DispatchSummary {
        let kind = event.kind();
        let mut summary = DispatchSummary::default();

        let Some(handlers) = self.handlers.get_mut(&kind) else {
            debug!(kind = %kind, "No handlers registered, event dropped");
            return summary;
        };

        for (index, handler) in handlers.iter_mut().enumerate() {
            summary.invoked += 1;
            if let Err(e) = handler(event) {
                summary.failed += 1;
                warn!(
                    kind = %kind,
                    handler = index,
                    timestamp = %event.timestamp(),
                    error = %e,
                    "Event handler failed"
                );
            }
        }

        summary
    }

    /// 已注册的 handler 数量
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_register_handlers() {
        let mut observer = Observer::new();
        assert_eq!(observer.handler_count(EventKind::Rain), 0);

        observer.on(EventKind::Rain, |_| Ok(()));
        observer.on(EventKind::Rain, |_| Ok(()));
        assert_eq!(observer.handler_count(EventKind::Rain), 2);
    }

    #[test]
    fn test_dispatch_passes_same_event() {
        let mut observer = Observer::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            observer.on(EventKind::Rain, move |ev| {
                seen.lock().unwrap().push(ev.clone());
                Ok(())
            });
        }

        let event = Event::rain(Local::now());
        let summary = observer.dispatch(&event);

        assert_eq!(summary, DispatchSummary { invoked: 2, failed: 0 });
        let seen = seen.lock().unwrap();
        assert!(seen.iter().all(|ev| *ev == event));
    }

    #[test]
    fn test_failed_handler_is_counted() {
        let mut observer = Observer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        observer.on(EventKind::Rain, |_| Err(anyhow::anyhow!("boom")));
        let counter = calls.clone();
        observer.on(EventKind::Rain, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let summary = observer.dispatch(&Event::rain(Local::now()));
        assert_eq!(summary, DispatchSummary { invoked: 2, failed: 1 });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_state_persists_between_dispatches() {
        let mut observer = Observer::new();
        let total = Arc::new(AtomicUsize::new(0));
        let mut local_count = 0usize;

        let shared = total.clone();
        observer.on(EventKind::Rain, move |_| {
            local_count += 1;
            shared.store(local_count, Ordering::SeqCst);
            Ok(())
        });

        observer.dispatch(&Event::rain(Local::now()));
        observer.dispatch(&Event::rain(Local::now()));
        assert_eq!(total.load(Ordering::SeqCst), 2);
    }
}
