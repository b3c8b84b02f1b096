use std::fmt;

use thiserror::Error;

use crate::tagstruct::Command;
use crate::volume::FixedVolume;

/// Failure reported by the transaction mechanism underneath the client.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("could not connect to the sound server: {0}")]
    Connect(String),
    #[error("main loop stopped before the server answered")]
    MainloopStopped,
    #[error("{0} failed")]
    OperationFailed(&'static str),
    #[error("server rejected {0:?}")]
    Rejected(Command),
    #[error("malformed arguments for {0:?}")]
    MalformedArguments(Command),
    #[error("volume {0} is out of range")]
    InvalidVolume(FixedVolume),
    #[error("{0} channels exceed the protocol maximum")]
    TooManyChannels(usize),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("sink `{0}` not found")]
    SinkNotFound(String),
    #[error("sink `{0}` reports no channel volumes")]
    NoChannels(String),
    #[error("sink name {0:?} contains a NUL byte")]
    InvalidSinkName(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// An [`Error`] paired with the value a read operation reports alongside it.
///
/// `volume()` falls back to `0.0` and `mute()` falls back to `true`, so
/// callers that ignore the error still see a conservative value.
#[derive(Debug)]
pub struct Fallback<T> {
    value: T,
    error: Error,
}

impl<T> Fallback<T> {
    pub fn new(value: T, error: impl Into<Error>) -> Self {
        Self {
            value,
            error: error.into(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn into_parts(self) -> (T, Error) {
        (self.value, self.error)
    }
}

impl<T> fmt::Display for Fallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> std::error::Error for Fallback<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Fallback<T>> for Error {
    fn from(fallback: Fallback<T>) -> Self {
        fallback.error
    }
}
