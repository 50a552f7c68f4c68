use gnss::prelude::SV;
use hifitime::prelude::Epoch;

use crate::status::{SignalType, Status};

/// Single channel measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Pseudo range (m)
    pub pr: f64,
    /// Pseudo range standard deviation (m)
    pub pr_std: f64,
    /// Accumulated carrier phase magnitude (cycles)
    pub cp: f64,
    /// Carrier phase standard deviation (cycles)
    pub cp_std: f64,
    /// Instantaneous Doppler (Hz)
    pub dop: f64,
    /// Carrier to noise density ratio (dB-Hz)
    pub cno: f64,
    /// Continuous tracking duration (s)
    pub lock_time: f64,
    pub status: Status,
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pr={:.3}(+/-{:.3}) cp={:.3}(+/-{:.3}) dop={:.3} cno={:.1} lock={:.3}s",
            self.status,
            self.pr,
            self.pr_std,
            self.cp,
            self.cp_std,
            self.dop,
            self.cno,
            self.lock_time,
        )
    }
}

/// Frequency slot an [Observation] lands into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    L1,
    L2,
    L5,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
        }
    }
}

impl Slot {
    /// Selects the slot from decoded tracking [Status]
    pub fn from_status(status: &Status) -> Self {
        if status.primary {
            if status.signal == SignalType::L5 {
                Self::L5
            } else {
                Self::L1
            }
        } else {
            Self::L2
        }
    }
}

/// Per satellite [Observation]s within one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    pub sv: SV,
    pub l1: Option<Observation>,
    /// Either P-code or C-code derived, see [Satellite::l2_signal]
    pub l2: Option<Observation>,
    pub l5: Option<Observation>,
}

impl Satellite {
    pub fn new(sv: SV) -> Self {
        Self {
            sv,
            l1: None,
            l2: None,
            l5: None,
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<&Observation> {
        match slot {
            Slot::L1 => self.l1.as_ref(),
            Slot::L2 => self.l2.as_ref(),
            Slot::L5 => self.l5.as_ref(),
        }
    }

    /// Stores [Observation] into given [Slot], returns the replaced one.
    pub fn replace(&mut self, slot: Slot, observation: Observation) -> Option<Observation> {
        match slot {
            Slot::L1 => self.l1.replace(observation),
            Slot::L2 => self.l2.replace(observation),
            Slot::L5 => self.l5.replace(observation),
        }
    }

    /// Signal tracked on L2, if any
    pub fn l2_signal(&self) -> Option<SignalType> {
        self.l2.map(|obs| obs.status.signal)
    }

    /// Number of occupied slots
    pub fn num_observations(&self) -> usize {
        [self.l1, self.l2, self.l5]
            .iter()
            .filter(|obs| obs.is_some())
            .count()
    }
}

/// One decoded RANGEA message
#[derive(Debug, Clone, PartialEq)]
pub struct RangeEpoch {
    /// Sampling [Epoch], in GPST
    pub epoch: Epoch,
    /// [Satellite]s in order of first appearance
    pub satellites: Vec<Satellite>,
}

impl RangeEpoch {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            satellites: Vec::new(),
        }
    }

    /// Returns [Satellite] entry for this [SV], created when first seen.
    pub fn satellite_mut(&mut self, sv: SV) -> &mut Satellite {
        let index = match self.satellites.iter().position(|sat| sat.sv == sv) {
            Some(index) => index,
            None => {
                self.satellites.push(Satellite::new(sv));
                self.satellites.len() - 1
            },
        };
        &mut self.satellites[index]
    }

    /// Total number of [Observation]s
    pub fn total_observations(&self) -> usize {
        self.satellites.iter().map(|sat| sat.num_observations()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}
