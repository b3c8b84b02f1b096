#[derive(Debug, PartialEq)]
pub enum Target {
    Default,
    Sink(String),
}

#[derive(Debug, PartialEq)]
pub enum VolumeOp {
    ShowVolume,
    ShowMute,
    SetVolume(f32), // normalized
    SetMute(bool),
    ToggleMute,
}
