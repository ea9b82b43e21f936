//! # Host Bridge Traits
//!
//! Capabilities the authentication core needs from its host but does not
//! implement itself.
//!
//! ## Overview
//!
//! The sync framework that embeds the core supplies concrete adapters for each
//! trait. The core only ever talks to these abstractions, which keeps it
//! testable with mocks and free of platform code.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport used for authorized REST calls
//! - [`Clock`](time::Clock) - Time source, used to decide whether a credential expired
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Host adapters
//! should convert their platform errors into it with an actionable message.
//! The core never lets a `BridgeError` escape to the sync framework: it is
//! translated into the authentication/service taxonomy at the boundary.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
