//! # Dispatcher
//!
//! Periodic dispatch module.
//!
//! Responsibilities:
//! - Own the repeating schedule
//! - Build, sign and send one reading per tick
//! - Contain every per-tick failure within its tick

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod schedule;
pub mod senders;
pub mod tick;

pub use contracts::{HttpSender, InboundResponse, OutboundRequest};
pub use dispatcher::{
    create_dispatcher, Dispatcher, DispatcherConfig, RunningDispatcher,
    DEFAULT_SIGNER_QUEUE_CAPACITY,
};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use schedule::ScheduleHandle;
pub use senders::{HttpSenderConfig, LogSender, ReqwestSender};
pub use tick::{build_payload, run_tick, TickContext, TickOutcome};
