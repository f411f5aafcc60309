//! # Contracts
//!
//! Frozen interface contracts shared by the connector crates.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Wire Model
//! - One `Reading` per `Payload`, serialized as `{"data":[{"SID", "timestamp", "value"}]}`
//! - Timestamps are UTC strings with millisecond precision and a numeric offset
//! - Every request carries `Authorization` and `UrbanPulse-Timestamp` headers

mod auth;
mod blueprint;
mod error;
mod reading;
mod sender;
mod timestamp;

pub use auth::*;
pub use blueprint::*;
pub use error::*;
pub use reading::*;
pub use sender::*;
pub use timestamp::Timestamp;
