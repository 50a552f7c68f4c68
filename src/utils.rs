use gnss::prelude::{Constellation, SV};
use hifitime::prelude::{Duration, Epoch, TimeScale};

use crate::{error::ParsingError, status::SatelliteSystem};

/// Glonass slots are reported +37
const GLONASS_PRN_OFFSET: u16 = 37;

/// SBAS PRNs are reported +100
const SBAS_PRN_OFFSET: u16 = 100;

pub fn to_constellation(system: SatelliteSystem) -> Option<Constellation> {
    match system {
        SatelliteSystem::GPS => Some(Constellation::GPS),
        SatelliteSystem::Glonass => Some(Constellation::Glonass),
        SatelliteSystem::SBAS => Some(Constellation::SBAS),
        SatelliteSystem::Other(_) => None,
    }
}

/// Builds the [SV] identity from the reported PRN/slot number,
/// removing the receiver specific offsets.
pub fn to_sv(system: SatelliteSystem, reported: u16) -> Result<SV, ParsingError> {
    let invalid = ParsingError::InvalidIdentity {
        system: system.code(),
        prn: reported,
    };

    let constellation = to_constellation(system).ok_or(invalid.clone())?;

    let prn = match constellation {
        Constellation::Glonass => reported.checked_sub(GLONASS_PRN_OFFSET),
        Constellation::SBAS => reported.checked_sub(SBAS_PRN_OFFSET),
        _ => Some(reported),
    };

    let prn = prn
        .and_then(|prn| u8::try_from(prn).ok())
        .ok_or(invalid)?;

    Ok(SV::new(constellation, prn))
}

/// Builds the [Epoch] from GPS week and seconds of week.
/// Seconds outside of the week are carried over to the previous or following weeks.
/// `seconds` must be finite.
pub fn from_week_seconds(week: u32, seconds: f64) -> Epoch {
    Epoch::from_time_of_week(week, 0, TimeScale::GPST) + Duration::from_seconds(seconds)
}

/// Calendar breakdown of [Epoch] in GPST: 1980-01-06 origin, no leap seconds.
/// Returns (year, month, day, hours, minutes, seconds with fraction)
pub fn gpst_calendar(t: Epoch) -> (i32, u8, u8, u8, u8, f64) {
    // TAI and GPST share the same (leap free) calendar arithmetic
    let origin = Epoch::from_gregorian_tai_at_midnight(1980, 1, 6);
    let (y, m, d, hh, mm, ss, nanos) = (origin + t.to_gpst_duration()).to_gregorian_tai();
    (y, m, d, hh, mm, ss as f64 + nanos as f64 * 1.0E-9)
}

/// GPST year and day of year (1-366) of [Epoch]
pub fn gpst_day_of_year(t: Epoch) -> (i32, u16) {
    let (y, m, d, _, _, _) = gpst_calendar(t);
    let elapsed = Epoch::from_gregorian_tai_at_midnight(y, m, d)
        - Epoch::from_gregorian_tai_at_midnight(y, 1, 1);
    (y, (elapsed.to_seconds() / 86400.0).round() as u16 + 1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn glonass_slot_correction() {
        let sv = to_sv(SatelliteSystem::Glonass, 38).unwrap();
        assert_eq!(sv, SV::new(Constellation::Glonass, 1));
        assert_eq!(format!("{:x}", sv), "R01");
    }

    #[test]
    fn sbas_prn_correction() {
        let sv = to_sv(SatelliteSystem::SBAS, 138).unwrap();
        assert_eq!(sv, SV::new(Constellation::SBAS, 38));
        assert_eq!(format!("{:x}", sv), "S38");
    }

    #[test]
    fn gps_prn_unchanged() {
        let sv = to_sv(SatelliteSystem::GPS, 6).unwrap();
        assert_eq!(sv, SV::new(Constellation::GPS, 6));
        assert_eq!(format!("{:x}", sv), "G06");
    }

    #[test]
    fn invalid_identities() {
        assert_eq!(
            to_sv(SatelliteSystem::Glonass, 12),
            Err(ParsingError::InvalidIdentity { system: 1, prn: 12 })
        );
        assert!(to_sv(SatelliteSystem::SBAS, 99).is_err());
        assert!(to_sv(SatelliteSystem::GPS, 300).is_err());
        assert!(to_sv(SatelliteSystem::Other(3), 1).is_err());
    }

    #[test]
    fn gps_week_origin() {
        let t = from_week_seconds(0, 0.0);
        assert_eq!(gpst_calendar(t), (1980, 1, 6, 0, 0, 0.0));
    }

    #[test]
    fn gps_week_calendar() {
        let t = from_week_seconds(2000, 0.0);
        assert_eq!(gpst_calendar(t), (2018, 5, 6, 0, 0, 0.0));

        let t = from_week_seconds(1429, 226780.0);
        assert_eq!(gpst_calendar(t), (2007, 5, 29, 14, 59, 40.0));

        let (_, _, _, _, _, ss) = gpst_calendar(from_week_seconds(1429, 226780.5));
        assert!((ss - 40.5).abs() < 1.0E-9);
    }

    #[test]
    fn seconds_outside_of_week() {
        let t = from_week_seconds(1429, -10.0);
        assert_eq!(gpst_calendar(t), (2007, 5, 26, 23, 59, 50.0));
        assert_eq!(gpst_calendar(t), gpst_calendar(from_week_seconds(1428, 604790.0)));

        let t = from_week_seconds(1428, 604810.0);
        assert_eq!(gpst_calendar(t), (2007, 5, 27, 0, 0, 10.0));
    }

    #[test]
    fn day_of_year() {
        assert_eq!(gpst_day_of_year(from_week_seconds(1429, 226780.0)), (2007, 149));
        assert_eq!(gpst_day_of_year(from_week_seconds(0, 0.0)), (1980, 6));

        // 2008-12-31, leap year
        let t = Epoch::from_gpst_duration(Duration::from_days(10587.0));
        assert_eq!(gpst_day_of_year(t), (2008, 366));
    }
}
