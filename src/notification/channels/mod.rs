//! 具体渠道实现

pub mod noop;
pub mod slack;
pub mod twitter;
pub mod webhook;

pub use noop::NoopNotifier;
pub use slack::{SlackConfig, SlackNotifier};
pub use twitter::{TwitterConfig, TwitterNotifier};
pub use webhook::{WebhookConfig, WebhookNotifier};
