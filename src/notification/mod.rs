//! 通知层 - 渠道抽象、渠道构建以及降雨通知 handler
//!
//! # 使用示例
//! ```ignore
//! use amesh_observer::notification::{build_notifier, NotifierConfig, RainAlert};
//!
//! let notifier = build_notifier(&NotifierConfig::default())?;
//! let mut alert = RainAlert::new(notifier, ThrottleGate::default(), vec!["@here".into()]);
//! observer.on(EventKind::Rain, move |ev| alert.handle(ev));
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod formatter;
pub mod rain;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{build_notifier, NotifierConfig};
pub use channel::{Notifier, NotifierKind};
pub use channels::{NoopNotifier, SlackNotifier, TwitterNotifier, WebhookNotifier};
pub use formatter::compose_rain_message;
pub use rain::RainAlert;
