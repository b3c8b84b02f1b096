use crate::error::TransportError;
use crate::tagstruct::{Arg, Command};
use crate::volume::ChannelVolumes;

/// Snapshot of the server state relevant to sink addressing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerInfo {
    pub default_sink_name: String,
}

/// Snapshot of one sink, as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinkInfo {
    pub name: String,
    pub volumes: ChannelVolumes,
    pub muted: bool,
}

/// Blocking request/response access to a running sound server.
///
/// Each call is one round-trip. Implementations own connection state,
/// framing, timeouts and cancellation.
pub trait Transport {
    fn server_info(&mut self) -> Result<ServerInfo, TransportError>;

    fn sinks(&mut self) -> Result<Vec<SinkInfo>, TransportError>;

    /// Sends `command` with `args` and returns the raw reply payload.
    fn request(&mut self, command: Command, args: &[Arg]) -> Result<Vec<u8>, TransportError>;
}
