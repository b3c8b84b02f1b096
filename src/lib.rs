#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Volume and mute control for the sinks of a PulseAudio server.

pub mod client;
pub mod error;
pub mod pulseop;
pub mod tagstruct;
pub mod transport;
pub mod volume;

pub use client::Client;
pub use error::{Error, Fallback, TransportError};
pub use transport::{ServerInfo, SinkInfo, Transport};
