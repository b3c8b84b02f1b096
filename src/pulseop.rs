use libpulse_binding as pulse;

use std::cell::{Cell, RefCell};
use std::convert::TryFrom;
use std::rc::Rc;

use log::{debug, error};
use pulse::callbacks::ListResult;
use pulse::context::{Context, State};
use pulse::mainloop::standard::{IterateResult, Mainloop};
use pulse::operation::{Operation, State as OperationState};
use pulse::volume::{ChannelVolumes as PulseChannelVolumes, Volume};

use crate::error::TransportError;
use crate::tagstruct::{Arg, Command, CHANNELS_MAX, INVALID_INDEX, MUTE_OFF, MUTE_ON};
use crate::transport::{ServerInfo, SinkInfo, Transport};
use crate::volume::{ChannelVolumes, FixedVolume};

/// [`Transport`] over a libpulse context driven by a blocking standard main loop.
pub struct PulseConnection {
    context: Context,
    mainloop: Mainloop,
}

impl PulseConnection {
    /// Connects to `server`, or to the default server when `None`, and
    /// blocks until the context is ready.
    pub fn connect(application_name: &str, server: Option<&str>) -> Result<Self, TransportError> {
        let mainloop = Mainloop::new()
            .ok_or_else(|| TransportError::Connect("failed to create mainloop".to_owned()))?;
        let mut context = Context::new(&mainloop, application_name)
            .ok_or_else(|| TransportError::Connect("failed to create new context".to_owned()))?;
        context
            .connect(server, pulse::context::FlagSet::NOFLAGS, None)
            .map_err(|e| TransportError::Connect(format!("{:?}", e)))?;

        let mut connection = Self { context, mainloop };
        loop {
            connection.iterate()?;
            match connection.context.get_state() {
                State::Ready => break,
                State::Failed | State::Terminated => {
                    return Err(TransportError::Connect(
                        "context failed before becoming ready".to_owned(),
                    ));
                }
                _ => {}
            }
        }
        debug!("Connected to sound server");
        Ok(connection)
    }

    fn iterate(&mut self) -> Result<(), TransportError> {
        match self.mainloop.iterate(true) {
            IterateResult::Quit(_) | IterateResult::Err(_) => {
                error!("iterate state was not success, quitting...");
                Err(TransportError::MainloopStopped)
            }
            IterateResult::Success(_) => Ok(()),
        }
    }

    fn wait_for<F: ?Sized>(&mut self, operation: &Operation<F>) -> Result<(), TransportError> {
        while let OperationState::Running = operation.get_state() {
            self.iterate()?;
        }
        Ok(())
    }
}

impl Drop for PulseConnection {
    fn drop(&mut self) {
        self.context.disconnect();
    }
}

fn to_pulse_volumes(volumes: &ChannelVolumes) -> Result<PulseChannelVolumes, TransportError> {
    if volumes.is_empty() {
        return Err(TransportError::MalformedArguments(Command::SetSinkVolume));
    }
    let channels = u8::try_from(volumes.len())
        .ok()
        .filter(|&n| usize::from(n) <= CHANNELS_MAX)
        .ok_or_else(|| TransportError::TooManyChannels(volumes.len()))?;
    let mut out = PulseChannelVolumes::default();
    out.set_len(channels);
    for (slot, volume) in out.get_mut().iter_mut().zip(volumes) {
        if volume.0 > Volume::MAX.0 {
            error!("Value too large: {}", volume);
            return Err(TransportError::InvalidVolume(*volume));
        }
        *slot = Volume(volume.0);
    }
    Ok(out)
}

#[derive(Debug, PartialEq)]
enum SinkRef<'a> {
    Index(u32),
    Name(&'a str),
}

#[derive(Debug, PartialEq)]
enum Write<'a> {
    Volume(SinkRef<'a>, &'a ChannelVolumes),
    Mute(SinkRef<'a>, bool),
}

fn decode_write(command: Command, args: &[Arg]) -> Result<Write<'_>, TransportError> {
    let (sink, payload) = match args {
        [Arg::U32(INVALID_INDEX), Arg::Str(name), payload] => (SinkRef::Name(name.as_str()), payload),
        [Arg::U32(index), Arg::Str(_), payload] => (SinkRef::Index(*index), payload),
        _ => return Err(TransportError::MalformedArguments(command)),
    };
    match (command, payload) {
        (Command::SetSinkVolume, Arg::ChannelVolumes(volumes)) => Ok(Write::Volume(sink, volumes)),
        (Command::SetSinkMute, &Arg::Byte(MUTE_ON)) => Ok(Write::Mute(sink, true)),
        (Command::SetSinkMute, &Arg::Byte(MUTE_OFF)) => Ok(Write::Mute(sink, false)),
        _ => Err(TransportError::MalformedArguments(command)),
    }
}

impl Transport for PulseConnection {
    fn server_info(&mut self) -> Result<ServerInfo, TransportError> {
        let result = Rc::new(RefCell::new(None));
        let op = {
            let result = Rc::clone(&result);
            self.context.introspect().get_server_info(move |info| {
                *result.borrow_mut() = Some(ServerInfo {
                    default_sink_name: info
                        .default_sink_name
                        .as_deref()
                        .unwrap_or_default()
                        .to_owned(),
                });
            })
        };
        self.wait_for(&op)?;
        let info = result.borrow_mut().take();
        info.ok_or(TransportError::OperationFailed("get_server_info"))
    }

    fn sinks(&mut self) -> Result<Vec<SinkInfo>, TransportError> {
        let sinks = Rc::new(RefCell::new(Vec::new()));
        let failed = Rc::new(Cell::new(false));
        let op = {
            let sinks = Rc::clone(&sinks);
            let failed = Rc::clone(&failed);
            self.context
                .introspect()
                .get_sink_info_list(move |result| match result {
                    ListResult::Item(sink) => {
                        debug!("get_sink_info_list: Got sink {}", sink.index);
                        sinks.borrow_mut().push(SinkInfo {
                            name: sink.name.as_deref().unwrap_or_default().to_owned(),
                            volumes: sink.volume.get().iter().map(|v| FixedVolume(v.0)).collect(),
                            muted: sink.mute,
                        });
                    }
                    ListResult::End => debug!("get_sink_info_list: Got End"),
                    ListResult::Error => {
                        error!("get_sink_info_list: Got Error");
                        failed.set(true);
                    }
                })
        };
        self.wait_for(&op)?;
        if failed.get() {
            return Err(TransportError::OperationFailed("get_sink_info_list"));
        }
        let sinks = sinks.replace(Vec::new());
        Ok(sinks)
    }

    fn request(&mut self, command: Command, args: &[Arg]) -> Result<Vec<u8>, TransportError> {
        let write = decode_write(command, args)?;

        let success = Rc::new(Cell::new(None));
        let callback: Box<dyn FnMut(bool) + 'static> = {
            let success = Rc::clone(&success);
            Box::new(move |ok: bool| success.set(Some(ok)))
        };

        let mut introspect = self.context.introspect();
        let op = match write {
            Write::Volume(sink, volumes) => {
                let volumes = to_pulse_volumes(volumes)?;
                debug!("Setting volume of {:?}", sink);
                match sink {
                    SinkRef::Name(name) => {
                        introspect.set_sink_volume_by_name(name, &volumes, Some(callback))
                    }
                    SinkRef::Index(index) => {
                        introspect.set_sink_volume_by_index(index, &volumes, Some(callback))
                    }
                }
            }
            Write::Mute(sink, mute) => {
                debug!("Setting mute of {:?} to {}", sink, mute);
                match sink {
                    SinkRef::Name(name) => introspect.set_sink_mute_by_name(name, mute, Some(callback)),
                    SinkRef::Index(index) => {
                        introspect.set_sink_mute_by_index(index, mute, Some(callback))
                    }
                }
            }
        };
        self.wait_for(&op)?;

        match success.get() {
            Some(true) => Ok(Vec::new()),
            Some(false) => Err(TransportError::Rejected(command)),
            None => Err(TransportError::OperationFailed("sink update")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_volumes_keep_channel_order() {
        let volumes: ChannelVolumes = vec![FixedVolume(1), FixedVolume(0xFFFF)].into();
        let converted = to_pulse_volumes(&volumes).unwrap();
        assert_eq!(converted.len(), 2);
        assert_eq!(converted.get()[0].0, 1);
        assert_eq!(converted.get()[1].0, 0xFFFF);
    }

    #[test]
    fn pulse_volumes_reject_too_many_channels() {
        let volumes: ChannelVolumes = vec![FixedVolume(0); CHANNELS_MAX + 1].into();
        assert!(matches!(
            to_pulse_volumes(&volumes),
            Err(TransportError::TooManyChannels(33))
        ));
    }

    #[test]
    fn pulse_volumes_reject_out_of_range_volume() {
        let volumes = ChannelVolumes::mono(FixedVolume(u32::MAX));
        assert!(matches!(
            to_pulse_volumes(&volumes),
            Err(TransportError::InvalidVolume(FixedVolume(u32::MAX)))
        ));
        let volumes = ChannelVolumes::mono(FixedVolume(Volume::MAX.0));
        assert!(to_pulse_volumes(&volumes).is_ok());
    }

    #[test]
    fn pulse_volumes_reject_empty_vector() {
        assert!(matches!(
            to_pulse_volumes(&ChannelVolumes::default()),
            Err(TransportError::MalformedArguments(Command::SetSinkVolume))
        ));
    }

    fn addressed(index: u32, payload: Arg) -> Vec<Arg> {
        vec![Arg::U32(index), Arg::Str("speakers".to_owned()), payload]
    }

    #[test]
    fn decode_mute_sentinels() {
        let args = addressed(INVALID_INDEX, Arg::Byte(b'1'));
        assert_eq!(
            decode_write(Command::SetSinkMute, &args).unwrap(),
            Write::Mute(SinkRef::Name("speakers"), true)
        );
        let args = addressed(INVALID_INDEX, Arg::Byte(b'0'));
        assert_eq!(
            decode_write(Command::SetSinkMute, &args).unwrap(),
            Write::Mute(SinkRef::Name("speakers"), false)
        );
    }

    #[test]
    fn decode_rejects_plain_boolean_bytes() {
        for byte in &[0x00, 0x01] {
            let args = addressed(INVALID_INDEX, Arg::Byte(*byte));
            assert!(matches!(
                decode_write(Command::SetSinkMute, &args),
                Err(TransportError::MalformedArguments(Command::SetSinkMute))
            ));
        }
    }

    #[test]
    fn decode_uses_index_unless_sentinel() {
        let volumes = ChannelVolumes::mono(FixedVolume(0x7FFF));
        let args = addressed(3, Arg::ChannelVolumes(volumes.clone()));
        assert_eq!(
            decode_write(Command::SetSinkVolume, &args).unwrap(),
            Write::Volume(SinkRef::Index(3), &volumes)
        );
        let args = addressed(INVALID_INDEX, Arg::ChannelVolumes(volumes.clone()));
        assert_eq!(
            decode_write(Command::SetSinkVolume, &args).unwrap(),
            Write::Volume(SinkRef::Name("speakers"), &volumes)
        );
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let too_short = [Arg::U32(INVALID_INDEX), Arg::Str("speakers".to_owned())];
        assert!(matches!(
            decode_write(Command::SetSinkMute, &too_short),
            Err(TransportError::MalformedArguments(Command::SetSinkMute))
        ));

        let mut too_long = addressed(INVALID_INDEX, Arg::Byte(b'1'));
        too_long.push(Arg::Byte(b'1'));
        assert!(decode_write(Command::SetSinkMute, &too_long).is_err());

        let mismatched = addressed(INVALID_INDEX, Arg::ChannelVolumes(ChannelVolumes::default()));
        assert!(matches!(
            decode_write(Command::SetSinkMute, &mismatched),
            Err(TransportError::MalformedArguments(Command::SetSinkMute))
        ));
        let mismatched = addressed(INVALID_INDEX, Arg::Byte(b'1'));
        assert!(matches!(
            decode_write(Command::SetSinkVolume, &mismatched),
            Err(TransportError::MalformedArguments(Command::SetSinkVolume))
        ));
    }
}
