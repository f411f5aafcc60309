//! HttpSender implementations
//!
//! Contains ReqwestSender and LogSender.

mod http;
mod log;

pub use self::http::{HttpSenderConfig, ReqwestSender};
pub use self::log::LogSender;
