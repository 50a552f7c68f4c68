use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use crate::{collecter::settings::Settings as RinexSettings, range::Settings as RangeSettings};

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

fn command() -> Command {
    Command::new("range2rinex")
        .author("range2rinex contributors")
        .version(env!("CARGO_PKG_VERSION"))
        .about("NovAtel RANGEA log to RINEX V2.11 observation converter")
        .color(ColorChoice::Always)
        .next_help_heading("Input")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .action(ArgAction::Append)
                .help("Input file (ASCII log), may be repeated. Gzip compressed inputs must be terminated by .gz. Standard input is used when omitted."),
        )
        .next_help_heading("Signal selection")
        .arg(
            Arg::new("no-glonass")
                .long("no-glonass")
                .action(ArgAction::SetTrue)
                .help("Discard Glonass observations"),
        )
        .arg(
            Arg::new("no-sbas")
                .long("no-sbas")
                .action(ArgAction::SetTrue)
                .help("Discard SBAS observations"),
        )
        .arg(
            Arg::new("no-l5")
                .long("no-l5")
                .action(ArgAction::SetTrue)
                .help("Discard L5 observations"),
        )
        .next_help_heading("Output")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .action(ArgAction::Set)
                .conflicts_with("prefix")
                .help("Output file. RINEX is streamed to standard output when omitted."),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("DIR")
                .action(ArgAction::Set)
                .help("Output directory. The file is named after the marker and first epoch (V2 short file name)."),
        )
        .arg(
            Arg::new("gzip")
                .long("gzip")
                .action(ArgAction::SetTrue)
                .help("Gzip compress the output file"),
        )
        .next_help_heading("RINEX Header")
        .arg(
            Arg::new("header")
                .long("header")
                .value_name("JSON")
                .action(ArgAction::Set)
                .help("Header fields description (JSON file). Omitted fields keep their default value, command line options have precedence."),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .action(ArgAction::Set)
                .help("Marker name. Default is \"Novatel OEMV-3\""),
        )
        .arg(
            Arg::new("observer")
                .long("observer")
                .action(ArgAction::Set)
                .help("Observer name"),
        )
        .arg(
            Arg::new("agency")
                .long("agency")
                .action(ArgAction::Set)
                .help("Observer agency"),
        )
        .arg(
            Arg::new("receiver")
                .long("receiver")
                .action(ArgAction::Set)
                .help("Receiver model. Default is \"NOV OEMV3\""),
        )
        .arg(
            Arg::new("antenna")
                .long("antenna")
                .action(ArgAction::Set)
                .help("Antenna model. Default is \"LEIAT502\""),
        )
        .arg(
            Arg::new("position")
                .long("position")
                .value_name("x,y,z")
                .action(ArgAction::Set)
                .allow_hyphen_values(true)
                .help("Approximate marker position, ECEF coordinates in meters"),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .value_name("SECONDS")
                .action(ArgAction::Set)
                .help("Nominal sampling interval. Default is 10 s"),
        )
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: command().get_matches(),
        }
    }

    /// Input files, empty when reading standard input
    pub fn filepaths(&self) -> Vec<&String> {
        if let Some(fp) = self.matches.get_many::<String>("file") {
            fp.collect()
        } else {
            Vec::new()
        }
    }

    /// Output file path
    pub fn output(&self) -> Option<&String> {
        self.matches.get_one::<String>("output")
    }

    pub fn range_settings(&self) -> RangeSettings {
        RangeSettings {
            glonass: !self.matches.get_flag("no-glonass"),
            sbas: !self.matches.get_flag("no-sbas"),
            l5: !self.matches.get_flag("no-l5"),
        }
    }

    fn position(&self) -> Option<(f64, f64, f64)> {
        let position = self.matches.get_one::<String>("position")?;

        let coords = position
            .split(',')
            .map(|coord| {
                coord
                    .trim()
                    .parse::<f64>()
                    .unwrap_or_else(|e| panic!("Invalid coordinate \"{}\": {}", coord, e))
            })
            .collect::<Vec<_>>();

        match coords[..] {
            [x, y, z] => Some((x, y, z)),
            _ => panic!("Invalid position \"{}\": expecting x,y,z", position),
        }
    }

    pub fn rinex_settings(&self) -> RinexSettings {
        let mut settings = if let Some(path) = self.matches.get_one::<String>("header") {
            RinexSettings::from_json_file(path)
                .unwrap_or_else(|e| panic!("Failed to load \"{}\": {}", path, e))
        } else {
            RinexSettings::default()
        };

        if self.matches.get_flag("gzip") {
            settings.gzip = true;
        }

        if let Some(prefix) = self.matches.get_one::<String>("prefix") {
            settings.prefix = Some(prefix.to_string());
        }

        if let Some(marker) = self.matches.get_one::<String>("marker") {
            settings.marker = marker.to_string();
        }

        if let Some(observer) = self.matches.get_one::<String>("observer") {
            settings.observer = observer.to_string();
        }

        if let Some(agency) = self.matches.get_one::<String>("agency") {
            settings.agency = agency.to_string();
        }

        if let Some(model) = self.matches.get_one::<String>("receiver") {
            settings.receiver.model = model.to_string();
        }

        if let Some(model) = self.matches.get_one::<String>("antenna") {
            settings.antenna.model = model.to_string();
        }

        if let Some(position) = self.position() {
            settings.position = position;
        }

        if let Some(interval) = self.matches.get_one::<String>("interval") {
            settings.interval = interval
                .trim()
                .parse::<f64>()
                .unwrap_or_else(|e| panic!("Invalid interval: {}", e));
        }

        settings
    }
}
