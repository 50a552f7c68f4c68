use std::{fs::File, io::BufReader, path::Path};

use hifitime::prelude::Epoch;

use serde::Deserialize;

use crate::{error::ConfigError, utils::gpst_day_of_year};

/// Receiver description
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Receiver {
    pub serial_number: String,
    pub model: String,
    pub firmware: String,
}

impl Default for Receiver {
    fn default() -> Self {
        Self {
            serial_number: "1".to_string(),
            model: "NOV OEMV3".to_string(),
            firmware: "3.907".to_string(),
        }
    }
}

/// Antenna description
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Antenna {
    pub serial_number: String,
    pub model: String,
}

impl Default for Antenna {
    fn default() -> Self {
        Self {
            serial_number: "1".to_string(),
            model: "LEIAT502".to_string(),
        }
    }
}

/// RINEX production [Settings]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// GZIP compression
    pub gzip: bool,

    /// Custom file prefix. Standard file name is generated when defined.
    pub prefix: Option<String>,

    /// Producing program
    pub program: String,

    /// Program operator
    pub run_by: String,

    /// Marker name, also names the output file
    pub marker: String,

    pub observer: String,

    pub agency: String,

    pub receiver: Receiver,

    pub antenna: Antenna,

    /// Approximate marker position, ECEF (m)
    pub position: (f64, f64, f64),

    /// Antenna height, east and north eccentricities (m)
    pub antenna_delta: (f64, f64, f64),

    /// Nominal sampling interval (s)
    pub interval: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let run_by = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "Unknown".to_string());

        Self {
            gzip: false,
            prefix: None,
            program: format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            run_by,
            marker: "Novatel OEMV-3".to_string(),
            observer: "None".to_string(),
            agency: "None".to_string(),
            receiver: Default::default(),
            antenna: Default::default(),
            position: (0.0, 0.0, 0.0),
            antenna_delta: (0.0, 0.0, 0.0),
            interval: 10.0,
        }
    }
}

impl Settings {
    /// Loads [Settings] from JSON description. Omitted fields are defaulted.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let fd = File::open(path)?;
        let settings = serde_json::from_reader(BufReader::new(fd))?;
        Ok(settings)
    }

    /// Standard file path, when a prefix is defined
    pub fn filename(&self, t: Epoch) -> Option<String> {
        let prefix = self.prefix.as_ref()?;
        Some(format!("{}/{}", prefix, self.obs_v2_filename(t)))
    }

    /// Four character station code, from the marker name
    fn station_code(&self) -> String {
        self.marker
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(4)
            .collect::<String>()
            .to_uppercase()
    }

    /// V2 short file name, dated in GPST like the observations
    fn obs_v2_filename(&self, t: Epoch) -> String {
        let (y, doy) = gpst_day_of_year(t);

        let mut formatted = self.station_code();

        formatted.push_str(&format!("{:03}", doy));
        formatted.push_str("0.");

        formatted.push_str(&format!("{:02}", y % 100));
        formatted.push('O');

        if self.gzip {
            formatted.push_str(".gz")
        }

        formatted
    }
}
