use log::debug;

use crate::error::{Error, Fallback};
use crate::tagstruct::{mute_sentinel, Arg, Command, INVALID_INDEX};
use crate::transport::{SinkInfo, Transport};
use crate::volume::{normalized_to_volume, volume_to_normalized, ChannelVolumes};

/// Volume and mute control of playback sinks.
///
/// Operations without a sink name act on the server's default sink. The
/// default sink name and the sink list are fetched in two separate
/// round-trips, so a default sink change between them is not detected: the
/// lookup then fails with [`Error::SinkNotFound`] or reads the new sink.
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Volume of the default sink's first channel, from 0.0 up (above 1.0
    /// when amplified). Falls back to `0.0` on error.
    pub fn volume(&mut self) -> Result<f32, Fallback<f32>> {
        let sink = self.default_sink().map_err(|e| Fallback::new(0.0, e))?;
        let volume = sink
            .volumes
            .first()
            .ok_or_else(|| Fallback::new(0.0, Error::NoChannels(sink.name.clone())))?;
        Ok(volume_to_normalized(volume))
    }

    /// Sets the volume of the default sink.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), Error> {
        let name = self.default_sink_name()?;
        self.set_sink_volume(&name, volume)
    }

    pub fn set_sink_volume(&mut self, sink_name: &str, volume: f32) -> Result<(), Error> {
        let volumes = ChannelVolumes::mono(normalized_to_volume(volume));
        debug!("Setting volume of sink {} to {:?}", sink_name, volumes);
        self.send_to_sink(
            Command::SetSinkVolume,
            sink_name,
            Arg::ChannelVolumes(volumes),
        )
    }

    /// Whether the default sink is muted. Falls back to `true` on error.
    pub fn mute(&mut self) -> Result<bool, Fallback<bool>> {
        self.default_sink()
            .map(|sink| sink.muted)
            .map_err(|e| Fallback::new(true, e))
    }

    pub fn set_mute(&mut self, muted: bool) -> Result<(), Error> {
        let name = self.default_sink_name()?;
        self.set_sink_mute(&name, muted)
    }

    pub fn set_sink_mute(&mut self, sink_name: &str, muted: bool) -> Result<(), Error> {
        debug!("Setting mute of sink {} to {}", sink_name, muted);
        self.send_to_sink(
            Command::SetSinkMute,
            sink_name,
            Arg::Byte(mute_sentinel(muted)),
        )
    }

    /// Flips the mute state of the default sink and returns the new state.
    ///
    /// If the write fails, the error carries the state that was requested.
    /// If the initial read fails, it carries `true`.
    pub fn toggle_mute(&mut self) -> Result<bool, Fallback<bool>> {
        let muted = !self.mute()?;
        self.set_mute(muted)
            .map(|()| muted)
            .map_err(|e| Fallback::new(muted, e))
    }

    fn default_sink_name(&mut self) -> Result<String, Error> {
        let name = self.transport.server_info()?.default_sink_name;
        debug!("Default sink is {}", name);
        Ok(name)
    }

    fn default_sink(&mut self) -> Result<SinkInfo, Error> {
        let name = self.default_sink_name()?;
        self.transport
            .sinks()?
            .into_iter()
            .find(|sink| sink.name == name)
            .ok_or(Error::SinkNotFound(name))
    }

    fn send_to_sink(&mut self, command: Command, sink_name: &str, payload: Arg) -> Result<(), Error> {
        if sink_name.contains('\0') {
            return Err(Error::InvalidSinkName(sink_name.to_owned()));
        }
        let args = [
            Arg::U32(INVALID_INDEX),
            Arg::Str(sink_name.to_owned()),
            payload,
        ];
        self.transport.request(command, &args)?;
        Ok(())
    }
}
