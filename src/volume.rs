use std::fmt;
use std::iter::FromIterator;
use std::slice;

/// Raw value corresponding to a normalized volume of 1.0 ("100%").
pub const VOLUME_NORM: FixedVolume = FixedVolume(0xFFFF);

/// Server-native volume unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FixedVolume(pub u32);

impl fmt::Display for FixedVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Converts a normalized volume to the raw representation.
///
/// The product is truncated toward zero. Negative and NaN inputs encode to 0,
/// and results beyond `u32::MAX` saturate.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn normalized_to_volume(normalized: f32) -> FixedVolume {
    FixedVolume((normalized * VOLUME_NORM.0 as f32) as u32)
}

/// Converts a raw volume back to a normalized one. Raw values above
/// [`VOLUME_NORM`] give results above 1.0.
#[allow(clippy::cast_precision_loss)]
pub fn volume_to_normalized(volume: FixedVolume) -> f32 {
    volume.0 as f32 / VOLUME_NORM.0 as f32
}

#[allow(clippy::cast_possible_truncation)]
pub fn percent_to_normalized(percent: f64) -> f32 {
    (percent / 100.0) as f32
}

/// Per-channel volumes of a sink, in channel order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelVolumes(Vec<FixedVolume>);

impl ChannelVolumes {
    /// Single-channel vector. This is the only shape written to the server.
    pub fn mono(volume: FixedVolume) -> Self {
        Self(vec![volume])
    }

    pub fn first(&self) -> Option<FixedVolume> {
        self.0.first().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, FixedVolume> {
        self.0.iter()
    }
}

impl From<Vec<FixedVolume>> for ChannelVolumes {
    fn from(volumes: Vec<FixedVolume>) -> Self {
        Self(volumes)
    }
}

impl FromIterator<FixedVolume> for ChannelVolumes {
    fn from_iter<I: IntoIterator<Item = FixedVolume>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ChannelVolumes {
    type Item = &'a FixedVolume;
    type IntoIter = slice::Iter<'a, FixedVolume>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
