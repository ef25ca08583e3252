//! Transport shims and configuration for the Trackside receiver.
//!
//! - [`UdpIngest`]: tokio datagram loop feeding a shared aggregator
//! - [`PushIngest`]: entry point for publish/subscribe client callbacks
//! - [`IngestConfig`]: file-based settings with firmware defaults
//!
//! Both producers can run at once against one `Arc<TelemetryAggregator>`
//! and one set of counters.

#![deny(static_mut_refs)]

pub mod config;
pub mod push;
pub mod udp;

pub use config::{ConfigFormat, IngestConfig, UdpConfig};
pub use push::PushIngest;
pub use udp::{UdpIngest, UdpIngestHandle};
