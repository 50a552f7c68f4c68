use crate::{
    collecter::lli::LliFlags,
    range::{Satellite, Slot},
    status::SignalType,
};

/// Lock time below which a cycle slip is declared (s)
const LOCK_TIME_THRESHOLD_S: f64 = 10.0;

/// RINEX V2 observation codes, declared in canonical (header) order
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Observable {
    /// C/A derived pseudo range on L1
    C1,
    /// L1 carrier phase
    L1,
    /// L1 Doppler
    D1,
    /// L1 signal strength
    S1,
    /// L2C derived pseudo range
    C2,
    /// P-code derived pseudo range on L2
    P2,
    /// L2 carrier phase
    L2,
    /// L2 Doppler
    D2,
    /// L2 signal strength
    S2,
    /// L5 pseudo range
    C5,
    /// L5 carrier phase
    L5,
    /// L5 Doppler
    D5,
    /// L5 signal strength
    S5,
}

/// Codes registered as soon as one L1 observation exists
pub const L1_BUNDLE: [Observable; 4] = [
    Observable::C1,
    Observable::L1,
    Observable::D1,
    Observable::S1,
];

/// Codes registered as soon as one L5 observation exists
pub const L5_BUNDLE: [Observable; 4] = [
    Observable::C5,
    Observable::L5,
    Observable::D5,
    Observable::S5,
];

/// L2 codes common to all tracked L2 signals
pub const L2_BUNDLE: [Observable; 3] = [Observable::L2, Observable::D2, Observable::S2];

impl std::fmt::Display for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::C1 => "C1",
            Self::L1 => "L1",
            Self::D1 => "D1",
            Self::S1 => "S1",
            Self::C2 => "C2",
            Self::P2 => "P2",
            Self::L2 => "L2",
            Self::D2 => "D2",
            Self::S2 => "S2",
            Self::C5 => "C5",
            Self::L5 => "L5",
            Self::D5 => "D5",
            Self::S5 => "S5",
        };
        f.pad(code)
    }
}

/// One formatted observation
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Field {
    pub value: f64,
    /// Loss of lock indicator
    pub lli: LliFlags,
    /// Signal strength indicator
    pub ssi: u8,
}

impl Field {
    fn new(value: f64, lli: LliFlags, ssi: u8) -> Self {
        Self { value, lli, ssi }
    }
}

/// Quantizes C/N0 (dB-Hz) to the 1-9 RINEX range, half to even
pub fn signal_strength(cno: f64) -> u8 {
    (cno / 6.0).round_ties_even().clamp(0.0, 9.0) as u8
}

impl Observable {
    /// Frequency slot this code is sourced from
    pub fn slot(&self) -> Slot {
        match self {
            Self::C1 | Self::L1 | Self::D1 | Self::S1 => Slot::L1,
            Self::C2 | Self::P2 | Self::L2 | Self::D2 | Self::S2 => Slot::L2,
            Self::C5 | Self::L5 | Self::D5 | Self::S5 => Slot::L5,
        }
    }

    /// Builds the [Field] of this code for given [Satellite], if observed.
    /// Only one of [Observable::C2] and [Observable::P2] exists per satellite,
    /// depending on the tracked L2 signal.
    pub fn field(&self, satellite: &Satellite) -> Option<Field> {
        let obs = satellite.slot(self.slot())?;

        let signal = obs.status.signal;
        let ssi = signal_strength(obs.cno);

        let mut lock = LliFlags::empty();
        lock.set(LliFlags::LOCK_LOSS, obs.lock_time < LOCK_TIME_THRESHOLD_S);

        let mut anti_spoofing = LliFlags::empty();
        anti_spoofing.set(LliFlags::UNDER_ANTI_SPOOFING, signal.is_anti_spoofed());

        let none = LliFlags::empty();

        match self {
            Self::C1 => Some(Field::new(obs.pr, none, ssi)),
            Self::L1 => Some(Field::new(obs.cp, lock, ssi)),
            Self::C2 => {
                if signal == SignalType::L2C {
                    Some(Field::new(obs.pr, none, ssi))
                } else {
                    None
                }
            },
            Self::P2 => {
                if signal == SignalType::L2C {
                    None
                } else {
                    Some(Field::new(obs.pr, anti_spoofing, ssi))
                }
            },
            Self::L2 => Some(Field::new(obs.cp, lock | anti_spoofing, ssi)),
            Self::C5 => Some(Field::new(obs.pr, lock, ssi)),
            Self::L5 => Some(Field::new(obs.cp, lock, ssi)),
            Self::D1 | Self::D2 | Self::D5 => Some(Field::new(obs.dop, none, 0)),
            Self::S1 | Self::S2 | Self::S5 => Some(Field::new(obs.cno, none, 0)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        range::{Observation, Satellite},
        status::Status,
    };
    use gnss::prelude::{Constellation, SV};

    fn observation(lock_time: f64, status: u32) -> Observation {
        Observation {
            pr: 2.1E7,
            pr_std: 0.1,
            cp: 1.1E8,
            cp_std: 0.01,
            dop: -1000.0,
            cno: 45.0,
            lock_time,
            status: Status::from(status),
        }
    }

    #[test]
    fn canonical_order() {
        let mut codes = vec![
            Observable::S5,
            Observable::P2,
            Observable::C1,
            Observable::L2,
            Observable::C2,
        ];
        codes.sort();
        assert_eq!(
            codes,
            vec![
                Observable::C1,
                Observable::C2,
                Observable::P2,
                Observable::L2,
                Observable::S5
            ]
        );
    }

    #[test]
    fn padded_display() {
        assert_eq!(format!("{:>6}", Observable::P2), "    P2");
        assert_eq!(Observable::D5.to_string(), "D5");
    }

    #[test]
    fn snr_bucket() {
        assert_eq!(signal_strength(43.3), 7);
        assert_eq!(signal_strength(36.9), 6);
        assert_eq!(signal_strength(45.0), 8); // 7.5
        assert_eq!(signal_strength(39.0), 6); // 6.5
        assert_eq!(signal_strength(2.0), 0);
        assert_eq!(signal_strength(-5.0), 0);
        assert_eq!(signal_strength(80.0), 9);
    }

    #[test]
    fn l2_code_variants() {
        let mut sat = Satellite::new(SV::new(Constellation::GPS, 1));

        // L2P codeless
        sat.l2 = Some(observation(100.0, 0x0130_9c0b));
        let p2 = Observable::P2.field(&sat).unwrap();
        assert_eq!(p2.lli, LliFlags::UNDER_ANTI_SPOOFING);
        assert_eq!(p2.ssi, 8);
        assert!(Observable::C2.field(&sat).is_none());
        assert_eq!(
            Observable::L2.field(&sat).unwrap().lli,
            LliFlags::UNDER_ANTI_SPOOFING
        );

        // L2P
        sat.l2 = Some(observation(100.0, 0x00b0_9c0b));
        assert!(Observable::P2.field(&sat).unwrap().lli.is_empty());
        assert!(Observable::C2.field(&sat).is_none());

        // L2C
        sat.l2 = Some(observation(5.0, 0x0230_9c0b));
        assert!(Observable::P2.field(&sat).is_none());
        let c2 = Observable::C2.field(&sat).unwrap();
        assert_eq!(c2.value, 2.1E7);
        assert!(c2.lli.is_empty());
        assert_eq!(Observable::L2.field(&sat).unwrap().lli, LliFlags::LOCK_LOSS);
    }

    #[test]
    fn lock_time_indicator() {
        let mut sat = Satellite::new(SV::new(Constellation::GPS, 1));
        sat.l1 = Some(observation(9.99, 0x0810_9c04));

        assert_eq!(Observable::L1.field(&sat).unwrap().lli, LliFlags::LOCK_LOSS);
        assert!(Observable::C1.field(&sat).unwrap().lli.is_empty());

        sat.l1 = Some(observation(10.0, 0x0810_9c04));
        assert!(Observable::L1.field(&sat).unwrap().lli.is_empty());
    }

    #[test]
    fn doppler_and_strength_fields() {
        let mut sat = Satellite::new(SV::new(Constellation::GPS, 1));
        sat.l5 = Some(observation(1.0, 0x09c0_9c04));

        assert_eq!(
            Observable::D5.field(&sat),
            Some(Field {
                value: -1000.0,
                lli: LliFlags::empty(),
                ssi: 0
            })
        );
        assert_eq!(
            Observable::S5.field(&sat),
            Some(Field {
                value: 45.0,
                lli: LliFlags::empty(),
                ssi: 0
            })
        );
        assert_eq!(Observable::C5.field(&sat).unwrap().lli, LliFlags::LOCK_LOSS);
        assert!(Observable::C1.field(&sat).is_none());
    }
}
