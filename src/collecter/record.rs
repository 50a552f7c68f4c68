use std::io::{BufWriter, Write};

use itertools::Itertools;

use crate::{
    collecter::{
        Collecter,
        observable::{Field, Observable},
    },
    error::FormattingError,
    range::RangeEpoch,
    utils::gpst_calendar,
};

/// Observation fields per line
const OBSERVATIONS_PER_LINE: usize = 5;

/// Satellite identifiers per epoch line
const SATELLITES_PER_LINE: usize = 12;

/// Epoch flag: no event
const EPOCH_FLAG_OK: u8 = 0;

/// Missing observation (F14.3 + LLI + SSI)
const BLANK_FIELD: &str = "                ";

/// Satellite list continuation offset
const SV_LIST_PADDING: &str = "                                ";

/// Single digit indicator, zero is left blank
fn fmt_indicator(value: u8) -> char {
    if value == 0 {
        ' '
    } else {
        char::from_digit(value as u32, 10).unwrap_or(' ')
    }
}

fn fmt_field(field: Option<Field>) -> String {
    match field {
        Some(field) if field.value != 0.0 => format!(
            "{:14.3}{}{}",
            field.value,
            fmt_indicator(field.lli.bits()),
            fmt_indicator(field.ssi)
        ),
        _ => BLANK_FIELD.to_string(),
    }
}

impl Collecter {
    pub(crate) fn format_epoch<W: Write>(
        &self,
        w: &mut BufWriter<W>,
        epoch: &RangeEpoch,
    ) -> Result<(), FormattingError> {
        let (y, m, d, hh, mm, ss) = gpst_calendar(epoch.epoch);

        write!(
            w,
            " {:02} {:2} {:2} {:2} {:2}{:11.7}  {}{:3}",
            y % 100,
            m,
            d,
            hh,
            mm,
            ss,
            EPOCH_FLAG_OK,
            epoch.satellites.len()
        )?;

        let sv_list = epoch
            .satellites
            .iter()
            .map(|sat| format!("{:x}", sat.sv))
            .collect::<Vec<_>>();

        writeln!(
            w,
            "{}",
            sv_list
                .chunks(SATELLITES_PER_LINE)
                .map(|chunk| chunk.concat())
                .join(&format!("\n{}", SV_LIST_PADDING))
        )?;

        let observables = self.observables.iter().collect::<Vec<&Observable>>();

        for sat in epoch.satellites.iter() {
            for chunk in observables.chunks(OBSERVATIONS_PER_LINE) {
                for observable in chunk {
                    write!(w, "{}", fmt_field(observable.field(sat)))?;
                }
                writeln!(w)?;
            }
        }

        Ok(())
    }
}
