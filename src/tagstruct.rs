//! Typed arguments for the server's tagged request format.
//!
//! Every argument except [`Arg::Byte`] is written behind a one-byte type tag.
//! Integers are big-endian.

use std::convert::TryFrom;

use crate::error::TransportError;
use crate::volume::ChannelVolumes;

/// Sink index meaning "no index, resolve the sink by name".
pub const INVALID_INDEX: u32 = 0xFFFF_FFFF;

pub const CHANNELS_MAX: usize = 32;

pub const TAG_U32: u8 = b'L';
pub const TAG_STRING: u8 = b't';
pub const TAG_CVOLUME: u8 = b'v';

/// Mute sentinel sent for `true`. The server reads it as its boolean-true tag.
pub const MUTE_ON: u8 = b'1';
/// Mute sentinel sent for `false`.
pub const MUTE_OFF: u8 = b'0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    SetSinkVolume = 36,
    SetSinkMute = 39,
}

impl Command {
    pub const fn id(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    U32(u32),
    /// Written with a terminating NUL.
    Str(String),
    /// Written untagged.
    Byte(u8),
    ChannelVolumes(ChannelVolumes),
}

pub const fn mute_sentinel(muted: bool) -> u8 {
    if muted {
        MUTE_ON
    } else {
        MUTE_OFF
    }
}

pub fn encode_args(args: &[Arg], out: &mut Vec<u8>) -> Result<(), TransportError> {
    for arg in args {
        match arg {
            Arg::U32(value) => {
                out.push(TAG_U32);
                out.extend_from_slice(&value.to_be_bytes());
            }
            Arg::Str(value) => {
                out.push(TAG_STRING);
                out.extend_from_slice(value.as_bytes());
                out.push(0);
            }
            Arg::Byte(value) => out.push(*value),
            Arg::ChannelVolumes(volumes) => {
                let channels = u8::try_from(volumes.len())
                    .ok()
                    .filter(|&n| usize::from(n) <= CHANNELS_MAX)
                    .ok_or_else(|| TransportError::TooManyChannels(volumes.len()))?;
                out.push(TAG_CVOLUME);
                out.push(channels);
                for volume in volumes {
                    out.extend_from_slice(&volume.0.to_be_bytes());
                }
            }
        }
    }
    Ok(())
}

/// Encodes a full request body: command, sequence number, then `args`.
///
/// The libpulse transport never calls this. It is the byte layout a socket
/// transport would send, and it lets the layout be checked without a server.
pub fn encode_request(
    command: Command,
    sequence: u32,
    args: &[Arg],
) -> Result<Vec<u8>, TransportError> {
    let mut out = Vec::new();
    encode_args(&[Arg::U32(command.id()), Arg::U32(sequence)], &mut out)?;
    encode_args(args, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::FixedVolume;

    #[test]
    fn string_is_tagged_and_terminated() {
        let mut out = Vec::new();
        encode_args(&[Arg::Str("hw".to_owned())], &mut out).unwrap();
        assert_eq!(out, [b't', b'h', b'w', 0]);
    }

    #[test]
    fn channel_volumes_carry_count() {
        let volumes = ChannelVolumes::from(vec![FixedVolume(0x7FFF), FixedVolume(0x10000)]);
        let mut out = Vec::new();
        encode_args(&[Arg::ChannelVolumes(volumes)], &mut out).unwrap();
        assert_eq!(
            out,
            [b'v', 2, 0x00, 0x00, 0x7F, 0xFF, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn too_many_channels_rejected() {
        let volumes = ChannelVolumes::from(vec![FixedVolume(1); CHANNELS_MAX + 1]);
        let err = encode_args(&[Arg::ChannelVolumes(volumes)], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, TransportError::TooManyChannels(33)));
    }

    #[test]
    fn byte_is_untagged() {
        let mut out = Vec::new();
        encode_args(&[Arg::Byte(mute_sentinel(true)), Arg::Byte(mute_sentinel(false))], &mut out)
            .unwrap();
        assert_eq!(out, [0x31, 0x30]);
    }

    #[test]
    fn request_header() {
        let out = encode_request(Command::SetSinkMute, 7, &[]).unwrap();
        assert_eq!(out, [b'L', 0, 0, 0, 39, b'L', 0, 0, 0, 7]);
    }
}
