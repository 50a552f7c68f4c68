use std::io::{BufWriter, Write};

use hifitime::prelude::Epoch;

use crate::{
    collecter::{Collecter, settings::Settings},
    error::FormattingError,
    utils::gpst_calendar,
};

/// Observable codes per "# / TYPES OF OBSERV" line
const TYPES_PER_LINE: usize = 9;

/// Pads header content to column 60, then appends the label
fn fmt_rinex(content: &str, marker: &str) -> String {
    format!("{:<60}{}", content, marker)
}

/// Truncates to `width` characters, so columns never shift
fn fitted(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

fn fmt_time_of_obs(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss) = gpst_calendar(t);
    format!(
        "{:6}{:6}{:6}{:6}{:6}{:13.7}{:>8}",
        y, m, d, hh, mm, ss, "GPS"
    )
}

fn fmt_date(date: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = date.to_gregorian_utc();
    format!(
        "{:04}{:02}{:02} {:02}{:02}{:02} UTC",
        y, m, d, hh, mm, ss
    )
}

impl Collecter {
    pub(crate) fn format_header<W: Write>(
        &self,
        w: &mut BufWriter<W>,
        settings: &Settings,
        date: Epoch,
    ) -> Result<(), FormattingError> {
        let (first, last) = match (self.first_epoch(), self.last_epoch()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(FormattingError::EmptyRecord),
        };

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!(
                    "{:>9}{:11}{:<20}{:<20}",
                    "2.11", "", "OBSERVATION DATA", "M (MIXED)"
                ),
                "RINEX VERSION / TYPE"
            )
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!(
                    "{:<20}{:<20}{:<20}",
                    fitted(&settings.program, 20),
                    fitted(&settings.run_by, 20),
                    fmt_date(date),
                ),
                "PGM / RUN BY / DATE"
            )
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(&fitted(&settings.marker, 60), "MARKER NAME")
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!(
                    "{:<20}{:<40}",
                    fitted(&settings.observer, 20),
                    fitted(&settings.agency, 40)
                ),
                "OBSERVER / AGENCY"
            )
        )?;

        let receiver = &settings.receiver;

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!(
                    "{:<20}{:<20}{:<20}",
                    fitted(&receiver.serial_number, 20),
                    fitted(&receiver.model, 20),
                    fitted(&receiver.firmware, 20),
                ),
                "REC # / TYPE / VERS"
            )
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!(
                    "{:<20}{:<20}",
                    fitted(&settings.antenna.serial_number, 20),
                    fitted(&settings.antenna.model, 20),
                ),
                "ANT # / TYPE"
            )
        )?;

        let (x, y, z) = settings.position;

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!("{:14.4}{:14.4}{:14.4}", x, y, z),
                "APPROX POSITION XYZ"
            )
        )?;

        let (h, e, n) = settings.antenna_delta;

        writeln!(
            w,
            "{}",
            fmt_rinex(
                &format!("{:14.4}{:14.4}{:14.4}", h, e, n),
                "ANTENNA: DELTA H/E/N"
            )
        )?;

        self.format_observables(w)?;

        writeln!(
            w,
            "{}",
            fmt_rinex(&format!("{:10.3}", settings.interval), "INTERVAL")
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(&fmt_time_of_obs(first), "TIME OF FIRST OBS")
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(&fmt_time_of_obs(last), "TIME OF LAST OBS")
        )?;

        writeln!(
            w,
            "{}",
            fmt_rinex(&format!("{:6}", self.satellites.len()), "# OF SATELLITES")
        )?;

        writeln!(w, "{}", fmt_rinex("", "END OF HEADER"))?;

        Ok(())
    }

    fn format_observables<W: Write>(&self, w: &mut BufWriter<W>) -> Result<(), FormattingError> {
        let observables = self.observables.iter().collect::<Vec<_>>();

        if observables.is_empty() {
            writeln!(w, "{}", fmt_rinex(&format!("{:6}", 0), "# / TYPES OF OBSERV"))?;
            return Ok(());
        }

        for (nth, chunk) in observables.chunks(TYPES_PER_LINE).enumerate() {
            let mut content = if nth == 0 {
                format!("{:6}", observables.len())
            } else {
                " ".repeat(6)
            };

            for observable in chunk {
                content.push_str(&format!("{:>6}", observable));
            }

            writeln!(w, "{}", fmt_rinex(&content, "# / TYPES OF OBSERV"))?;
        }

        Ok(())
    }
}
