//! Amesh Observer - 监控东京アメッシュ雷达，开始下雨时发送通知

pub mod config;
pub mod event;
pub mod notification;
pub mod observer;
pub mod poller;
pub mod reading;
pub mod throttle;

pub use config::Config;
pub use event::{Event, EventKind};
pub use notification::{build_notifier, Notifier, NotifierConfig, NotifierKind, RainAlert};
pub use observer::{DispatchSummary, Handler, Observer};
pub use poller::{PollStats, Poller, TickOutcome};
pub use reading::{AmeshEntry, AmeshSource, AmeshSourceConfig, Reading, ReadingSource};
pub use throttle::{GateState, ThrottleGate};
