//! RINEX V2.11 observation collection
use std::{
    collections::BTreeSet,
    io::{BufWriter, Write},
};

use gnss::prelude::SV;
use hifitime::prelude::Epoch;
use log::debug;

use crate::{error::FormattingError, range::RangeEpoch, status::SignalType};

pub mod fd;
pub mod lli;
pub mod observable;
pub mod settings;

mod header;
mod record;

use observable::{L1_BUNDLE, L2_BUNDLE, L5_BUNDLE, Observable};
use settings::Settings;

/// [Collecter] buffers every [RangeEpoch] of the session,
/// because the RINEX header depends on the complete content.
#[derive(Debug, Default, Clone)]
pub struct Collecter {
    /// [RangeEpoch]s in order of arrival
    epochs: Vec<RangeEpoch>,

    /// Every [SV] encountered
    satellites: BTreeSet<SV>,

    /// Registered [Observable]s, in canonical order
    observables: BTreeSet<Observable>,
}

impl Collecter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new [RangeEpoch], updates the list of [Observable]s.
    /// Absent epoch is ignored.
    pub fn add(&mut self, epoch: Option<RangeEpoch>) {
        let Some(epoch) = epoch else {
            return;
        };

        self.satellites
            .extend(epoch.satellites.iter().map(|sat| sat.sv));

        if epoch.satellites.iter().any(|sat| sat.l1.is_some()) {
            self.register(epoch.epoch, &L1_BUNDLE);
        }

        if epoch.satellites.iter().any(|sat| sat.l5.is_some()) {
            self.register(epoch.epoch, &L5_BUNDLE);
        }

        if epoch.satellites.iter().any(|sat| sat.l2.is_some()) {
            self.register(epoch.epoch, &L2_BUNDLE);
        }

        let mut l2_signals = epoch.satellites.iter().filter_map(|sat| sat.l2_signal());

        if l2_signals.clone().any(|signal| signal.is_l2_p_code()) {
            self.register(epoch.epoch, &[Observable::P2]);
        }

        if l2_signals.any(|signal| signal == SignalType::L2C) {
            self.register(epoch.epoch, &[Observable::C2]);
        }

        self.epochs.push(epoch);
    }

    fn register(&mut self, t: Epoch, observables: &[Observable]) {
        for observable in observables {
            if self.observables.insert(*observable) {
                debug!("{} - new observable: {}", t, observable);
            }
        }
    }

    /// Collected [RangeEpoch]s, in order of arrival
    pub fn epochs(&self) -> &[RangeEpoch] {
        &self.epochs
    }

    /// Every [SV] encountered so far
    pub fn satellites(&self) -> &BTreeSet<SV> {
        &self.satellites
    }

    /// Registered [Observable]s, in canonical order
    pub fn observables(&self) -> &BTreeSet<Observable> {
        &self.observables
    }

    pub fn first_epoch(&self) -> Option<Epoch> {
        self.epochs.first().map(|epoch| epoch.epoch)
    }

    pub fn last_epoch(&self) -> Option<Epoch> {
        self.epochs.last().map(|epoch| epoch.epoch)
    }

    /// Total number of (per frequency) observations collected
    pub fn total_observations(&self) -> usize {
        self.epochs.iter().map(|epoch| epoch.total_observations()).sum()
    }

    /// Formats the complete RINEX file: header then every epoch.
    /// `date` is the file creation [Epoch].
    pub fn format<W: Write>(
        &self,
        w: &mut BufWriter<W>,
        settings: &Settings,
        date: Epoch,
    ) -> Result<(), FormattingError> {
        self.format_header(w, settings, date)?;

        for epoch in self.epochs.iter() {
            self.format_epoch(w, epoch)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::range::{
        Parser,
        test::{GLO_L1, GPS_L1, GPS_L2C, GPS_L2P, GPS_L2P_CODELESS, GPS_L5, RANGEA, message, record},
    };
    use gnss::prelude::Constellation;
    use std::str::FromStr;

    fn collect(lines: &[String]) -> Collecter {
        let parser = Parser::default();
        let mut collecter = Collecter::new();

        for line in lines {
            collecter.add(parser.parse(line).unwrap());
        }

        collecter
    }

    fn to_string(collecter: &Collecter) -> String {
        let date = Epoch::from_str("2024-03-01T12:30:15 UTC").unwrap();
        let settings = Settings {
            run_by: "ops".to_string(),
            ..Default::default()
        };

        let mut w = BufWriter::new(Vec::new());
        collecter.format(&mut w, &settings, date).unwrap();
        String::from_utf8(w.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn absent_epoch_ignored() {
        let mut collecter = Collecter::new();
        collecter.add(None);
        assert!(collecter.epochs().is_empty());
        assert!(collecter.observables().is_empty());
        assert!(collecter.first_epoch().is_none());
    }

    #[test]
    fn reference_observables() {
        let collecter = collect(&[RANGEA.to_string()]);

        assert_eq!(
            collecter.observables().iter().copied().collect::<Vec<_>>(),
            vec![
                Observable::C1,
                Observable::L1,
                Observable::D1,
                Observable::S1,
                Observable::P2,
                Observable::L2,
                Observable::D2,
                Observable::S2,
            ]
        );

        assert_eq!(collecter.total_observations(), 2);
        assert_eq!(
            collecter.satellites().iter().copied().collect::<Vec<_>>(),
            vec![SV::new(Constellation::GPS, 6)]
        );
    }

    #[test]
    fn idempotent_registration() {
        let mut collecter = collect(&[RANGEA.to_string()]);
        let observables = collecter.observables().clone();
        let total = collecter.total_observations();

        let parser = Parser::default();
        collecter.add(parser.parse(RANGEA).unwrap());

        assert_eq!(collecter.observables(), &observables);
        assert_eq!(collecter.total_observations(), 2 * total);
        assert_eq!(collecter.epochs().len(), 2);
        assert_eq!(collecter.satellites().len(), 1);
    }

    #[test]
    fn both_l2_code_variants() {
        let collecter = collect(&[message(
            1429,
            0.0,
            &[
                record(3, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L2C),
                record(4, 2.2E7, 1.2E8, 45.0, 100.0, GPS_L2P),
            ],
        )]);

        assert_eq!(
            collecter.observables().iter().copied().collect::<Vec<_>>(),
            vec![
                Observable::C2,
                Observable::P2,
                Observable::L2,
                Observable::D2,
                Observable::S2
            ]
        );
    }

    #[test]
    fn column_order_is_canonical() {
        let l5_first = collect(&[
            message(1429, 0.0, &[record(1, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L5)]),
            message(1429, 1.0, &[record(1, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L1)]),
        ]);

        let l1_first = collect(&[
            message(1429, 0.0, &[record(1, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L1)]),
            message(1429, 1.0, &[record(1, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L5)]),
        ]);

        assert_eq!(l5_first.observables(), l1_first.observables());

        assert_eq!(
            l5_first.observables().iter().copied().collect::<Vec<_>>(),
            vec![
                Observable::C1,
                Observable::L1,
                Observable::D1,
                Observable::S1,
                Observable::C5,
                Observable::L5,
                Observable::D5,
                Observable::S5,
            ]
        );

        // epochs keep their order of arrival
        assert!(l5_first.epochs()[0].satellites[0].l5.is_some());
        assert!(l5_first.epochs()[1].satellites[0].l1.is_some());
    }

    #[test]
    fn header_satellite_count() {
        let collecter = collect(&[
            message(
                1429,
                0.0,
                &[
                    record(1, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L1),
                    record(38, 2.1E7, 1.1E8, 45.0, 100.0, GLO_L1),
                ],
            ),
            message(
                1429,
                1.0,
                &[
                    record(1, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L1),
                    record(2, 2.1E7, 1.1E8, 45.0, 100.0, GPS_L1),
                ],
            ),
        ]);

        assert_eq!(collecter.satellites().len(), 3);

        let content = to_string(&collecter);
        let line = content
            .lines()
            .find(|line| line.ends_with("# OF SATELLITES"))
            .unwrap();

        assert_eq!(line.trim_end_matches("# OF SATELLITES").trim(), "3");
    }

    #[test]
    fn empty_record() {
        let collecter = Collecter::new();
        let mut w = BufWriter::new(Vec::new());
        assert!(matches!(
            collecter.format(&mut w, &Settings::default(), Epoch::from_gpst_seconds(0.0)),
            Err(FormattingError::EmptyRecord)
        ));
    }

    #[test]
    fn reference_conversion() {
        let collecter = collect(&[RANGEA.to_string()]);
        let content = to_string(&collecter);

        let lines = content.lines().collect::<Vec<_>>();

        let end_of_header = lines
            .iter()
            .position(|line| line.ends_with("END OF HEADER"))
            .unwrap();

        assert_eq!(
            lines[..end_of_header + 1],
            [
                "     2.11           OBSERVATION DATA    M (MIXED)           RINEX VERSION / TYPE",
                "range2rinex v0.1.0  ops                 20240301 123015 UTC PGM / RUN BY / DATE",
                "Novatel OEMV-3                                              MARKER NAME",
                "None                None                                    OBSERVER / AGENCY",
                "1                   NOV OEMV3           3.907               REC # / TYPE / VERS",
                "1                   LEIAT502                                ANT # / TYPE",
                "        0.0000        0.0000        0.0000                  APPROX POSITION XYZ",
                "        0.0000        0.0000        0.0000                  ANTENNA: DELTA H/E/N",
                "     8    C1    L1    D1    S1    P2    L2    D2    S2      # / TYPES OF OBSERV",
                "    10.000                                                  INTERVAL",
                "  2007     5    29    14    59   40.0000000     GPS         TIME OF FIRST OBS",
                "  2007     5    29    14    59   40.0000000     GPS         TIME OF LAST OBS",
                "     1                                                      # OF SATELLITES",
                "                                                            END OF HEADER",
            ]
        );

        assert_eq!(
            lines[end_of_header + 1..],
            [
                " 07  5 29 14 59 40.0000000  0  1G06",
                "  23359924.081 7 122757217.107 7     -3538.602          43.300    23359926.37546",
                "  95654966.81246     -2757.355          36.900  ",
            ]
        );
    }

    #[test]
    fn anti_spoofing_and_lock_flags() {
        let collecter = collect(&[message(
            1429,
            226780.5,
            &[
                record(6, 23359924.081, 122757217.106, 43.3, 2.5, GPS_L1),
                record(6, 23359926.375, 95654966.812, 36.9, 2.5, GPS_L2P_CODELESS),
            ],
        )]);

        let content = to_string(&collecter);
        let body = content
            .lines()
            .skip_while(|line| !line.ends_with("END OF HEADER"))
            .skip(1)
            .collect::<Vec<_>>();

        assert_eq!(body[0], " 07  5 29 14 59 40.5000000  0  1G06");
        assert_eq!(&body[1][16..32], " 122757217.10617");
        assert_eq!(&body[1][64..80], "  23359926.37546");
        assert_eq!(&body[2][..16], "  95654966.81256");
    }
}
