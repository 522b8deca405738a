//! AutoClaim connector: the HTTP proxy and dashboard API, the role
//! consoles and the guided report flow.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod relay;
pub mod report;
pub mod summarizer;
pub mod web_server;
