#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[macro_use]
extern crate clap;

mod args;
mod operations;

use log::{error, info};
use pulse_sink_volume::pulseop::PulseConnection;
use pulse_sink_volume::{Client, Error};

use operations::{Target, VolumeOp};

const APPLICATION_NAME: &str = "PulseSinkVolume";

fn run() -> Result<(), Error> {
    env_logger::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Auto)
        .default_format_module_path(false)
        .default_format_timestamp_nanos(true)
        .init();

    let arguments = args::get_arguments();
    let connection = PulseConnection::connect(APPLICATION_NAME, arguments.server.as_deref())?;
    let mut client = Client::new(connection);

    match (arguments.operation, arguments.target) {
        (VolumeOp::ShowVolume, _) => {
            let volume = client.volume()?;
            println!("{:.0}", f64::from(volume) * 100.0);
        }
        (VolumeOp::ShowMute, _) => {
            println!("{}", client.mute()?);
        }
        (VolumeOp::ToggleMute, _) => {
            let muted = client.toggle_mute()?;
            info!("Muted: {}", muted);
        }
        (VolumeOp::SetVolume(volume), Target::Default) => client.set_volume(volume)?,
        (VolumeOp::SetVolume(volume), Target::Sink(name)) => {
            client.set_sink_volume(&name, volume)?;
        }
        (VolumeOp::SetMute(muted), Target::Default) => client.set_mute(muted)?,
        (VolumeOp::SetMute(muted), Target::Sink(name)) => client.set_sink_mute(&name, muted)?,
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
