//! NovAtel RANGEA log decoding
use log::{debug, trace, warn};

use std::str::FromStr;

mod epoch;

pub use epoch::{Observation, RangeEpoch, Satellite, Slot};

use crate::{
    crc::crc_ok,
    error::ParsingError,
    status::{SatelliteSystem, SignalType, Status},
    utils::{from_week_seconds, to_sv},
};

/// RANGEA log header
const RANGEA_PREFIX: &str = "#RANGEA";

/// Week number position in the log header
const WEEK_FIELD: usize = 5;

/// Seconds of week position in the log header
const SECONDS_FIELD: usize = 6;

/// Fields per observation record
const RECORD_FIELDS: usize = 10;

/// Signal inclusion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Collect Glonass observations
    pub glonass: bool,
    /// Collect L5 observations
    pub l5: bool,
    /// Collect SBAS observations
    pub sbas: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glonass: true,
            l5: true,
            sbas: true,
        }
    }
}

/// Why a record was not retained
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rejection {
    UnsupportedSystem(u8),
    Glonass,
    SBAS,
    L5,
    UnknownParity,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedSystem(code) => write!(f, "unsupported system #{}", code),
            Self::Glonass => write!(f, "glonass disabled"),
            Self::SBAS => write!(f, "sbas disabled"),
            Self::L5 => write!(f, "l5 disabled"),
            Self::UnknownParity => write!(f, "unknown parity"),
        }
    }
}

fn parse_integer<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParsingError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ParsingError::IntegerParsing {
            field,
            value: value.to_string(),
        })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, ParsingError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ParsingError::FloatParsing {
            field,
            value: value.to_string(),
        })
}

/// Decoded but not yet attributed record
struct Record {
    /// Reported PRN or slot number
    prn: u16,
    /// Glonass frequency channel (+7)
    freq_id: i16,
    observation: Observation,
}

/// RANGEA message [Parser]
#[derive(Debug, Default, Clone)]
pub struct Parser {
    settings: Settings,
}

impl Parser {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Decodes one text line.
    /// Returns Ok(None) for lines that are not RANGEA logs.
    /// Invalid records are skipped (and reported) individually, the [RangeEpoch] may
    /// therefore be empty.
    pub fn parse(&self, line: &str) -> Result<Option<RangeEpoch>, ParsingError> {
        let line = line.trim_end();

        if !line.starts_with(RANGEA_PREFIX) {
            return Ok(None);
        }

        if !crc_ok(line) {
            return Err(ParsingError::ChecksumMismatch);
        }

        let (content, _) = line
            .rsplit_once('*')
            .ok_or(ParsingError::MissingSection("checksum"))?;

        let (header, data) = content
            .split_once(';')
            .ok_or(ParsingError::MissingSection("data"))?;

        let header = header.split(',').collect::<Vec<_>>();

        let week = header
            .get(WEEK_FIELD)
            .ok_or(ParsingError::MissingField("week"))?;

        let seconds = header
            .get(SECONDS_FIELD)
            .ok_or(ParsingError::MissingField("seconds of week"))?;

        let week = parse_integer::<u32>("week", week)?;
        let seconds = parse_float("seconds of week", seconds)?;

        if !seconds.is_finite() {
            return Err(ParsingError::FloatParsing {
                field: "seconds of week",
                value: seconds.to_string(),
            });
        }

        let mut epoch = RangeEpoch::new(from_week_seconds(week, seconds));

        let fields = data.split(',').collect::<Vec<_>>();

        // leading number of observations is not verified
        for fields in fields[1..].chunks_exact(RECORD_FIELDS) {
            let record = match Self::parse_record(fields) {
                Ok(record) => record,
                Err(e) => {
                    warn!("{} - record skipped: {}", epoch.epoch, e);
                    continue;
                },
            };

            if let Some(rejection) = self.rejection(&record.observation.status) {
                trace!("{} - #{} dropped: {}", epoch.epoch, record.prn, rejection);
                continue;
            }

            let sv = match to_sv(record.observation.status.system, record.prn) {
                Ok(sv) => sv,
                Err(e) => {
                    warn!("{} - record skipped: {}", epoch.epoch, e);
                    continue;
                },
            };

            let slot = Slot::from_status(&record.observation.status);

            trace!(
                "{}({}) - {} (freq #{}) {}",
                epoch.epoch, sv, slot, record.freq_id, record.observation
            );

            let satellite = epoch.satellite_mut(sv);

            if satellite.replace(slot, record.observation).is_some() {
                // may happen when one satellite is forced onto several channels
                warn!(
                    "{}({}) - {} observation already parsed: overwritten",
                    epoch.epoch, sv, slot
                );
            }
        }

        if epoch.is_empty() {
            debug!("{} - no observation retained", epoch.epoch);
        }

        Ok(Some(epoch))
    }

    /// Decodes one record
    fn parse_record(fields: &[&str]) -> Result<Record, ParsingError> {
        let prn = parse_integer::<u16>("prn", fields[0])?;
        let freq_id = parse_integer::<i16>("frequency", fields[1])?;

        let pr = parse_float("pseudo range", fields[2])?;
        let pr_std = parse_float("pseudo range std", fields[3])?;
        let cp = parse_float("carrier phase", fields[4])?.abs();
        let cp_std = parse_float("carrier phase std", fields[5])?;
        let dop = parse_float("doppler", fields[6])?;
        let cno = parse_float("c/n0", fields[7])?;
        let lock_time = parse_float("lock time", fields[8])?;

        let status = Status::from_str(fields[9])
            .map_err(|_| ParsingError::StatusParsing(fields[9].to_string()))?;

        Ok(Record {
            prn,
            freq_id,
            observation: Observation {
                pr,
                pr_std,
                cp,
                cp_std,
                dop,
                cno,
                lock_time,
                status,
            },
        })
    }

    /// Applies the inclusion policy
    fn rejection(&self, status: &Status) -> Option<Rejection> {
        match status.system {
            SatelliteSystem::Other(code) => return Some(Rejection::UnsupportedSystem(code)),
            SatelliteSystem::Glonass if !self.settings.glonass => return Some(Rejection::Glonass),
            SatelliteSystem::SBAS if !self.settings.sbas => return Some(Rejection::SBAS),
            _ => {},
        }

        if status.signal == SignalType::L5 && !self.settings.l5 {
            Some(Rejection::L5)
        } else if !status.parity_known {
            Some(Rejection::UnknownParity)
        } else {
            None
        }
    }
}
