//! Publish bridge: webhook dispatch and per-item reconciliation.

mod runner;
mod types;
mod webhook;

pub use runner::PublishRunner;
pub use types::{OutboundPost, PublishReceipt, PublishReport, PublisherError};
pub use webhook::{PublishBridge, WebhookPublisher};
