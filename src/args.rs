use crate::operations::{Target, VolumeOp};
use clap::{App, Arg, ArgGroup, ArgMatches};
use pulse_sink_volume::volume::percent_to_normalized;

pub struct Arguments {
    pub operation: VolumeOp,
    pub target: Target,
    pub server: Option<String>,
}

fn app() -> App<'static, 'static> {
    App::new("Sink Volume")
        .version(crate_version!())
        .about(crate_description!())
        .arg(
            Arg::with_name("volume")
                .long("volume")
                .short("v")
                .help("Print the volume of the default sink (in percent)")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("set_volume")
                .long("set-volume")
                .short("s")
                .help("Set volume to specified percent value")
                .takes_value(true)
                .validator(|v| {
                    v.parse::<f64>()
                        .map(|_| ())
                        .map_err(|e| format!("invalid percent value: {}", e))
                }),
        )
        .arg(
            Arg::with_name("mute")
                .long("mute")
                .short("m")
                .help("Print whether the default sink is muted")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("set_mute")
                .long("set-mute")
                .help("Mute or unmute")
                .takes_value(true)
                .possible_values(&["on", "off"]),
        )
        .arg(
            Arg::with_name("toggle_mute")
                .long("toggle-mute")
                .short("t")
                .help("Toggle mute of the default sink")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("sink")
                .long("sink")
                .help("Sink to change with --set-volume or --set-mute, the default sink if not specified")
                .takes_value(true)
                .conflicts_with_all(&["volume", "mute", "toggle_mute"]),
        )
        .arg(
            Arg::with_name("server")
                .long("server")
                .help("Server to connect to, the default server if not specified")
                .takes_value(true),
        )
        .group(
            ArgGroup::with_name("operation")
                .args(&["volume", "set_volume", "mute", "set_mute", "toggle_mute"])
                .required(true),
        )
}

fn operation(matches: &ArgMatches) -> VolumeOp {
    if matches.is_present("volume") {
        VolumeOp::ShowVolume
    } else if matches.is_present("mute") {
        VolumeOp::ShowMute
    } else if matches.is_present("toggle_mute") {
        VolumeOp::ToggleMute
    } else if let Some(state) = matches.value_of("set_mute") {
        VolumeOp::SetMute(state == "on")
    } else {
        let percent = matches
            .value_of("set_volume")
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or_default();
        VolumeOp::SetVolume(percent_to_normalized(percent))
    }
}

fn from_matches(matches: &ArgMatches) -> Arguments {
    let target = matches
        .value_of("sink")
        .map_or(Target::Default, |name| Target::Sink(name.to_owned()));
    Arguments {
        operation: operation(matches),
        target,
        server: matches.value_of("server").map(str::to_owned),
    }
}

pub fn get_arguments() -> Arguments {
    from_matches(&app().get_matches())
}
