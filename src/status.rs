//! Channel tracking status word
use std::fmt;

/// Channel tracking state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackingState {
    L1Idle,
    L1SkySearch,
    L1WidePullIn,
    L1NarrowPullIn,
    L1PhaseLock,
    L1Reacquisition,
    L1Steering,
    L1FrequencyLock,
    L2Idle,
    L2PCodeAlign,
    L2Search,
    L2PhaseLock,
    L2Steering,
    Unknown(u8),
}

impl From<u8> for TrackingState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::L1Idle,
            1 => Self::L1SkySearch,
            2 => Self::L1WidePullIn,
            3 => Self::L1NarrowPullIn,
            4 => Self::L1PhaseLock,
            5 => Self::L1Reacquisition,
            6 => Self::L1Steering,
            7 => Self::L1FrequencyLock,
            8 => Self::L2Idle,
            9 => Self::L2PCodeAlign,
            10 => Self::L2Search,
            11 => Self::L2PhaseLock,
            12 => Self::L2Steering,
            value => Self::Unknown(value),
        }
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1Idle => write!(f, "L1 idle"),
            Self::L1SkySearch => write!(f, "L1 sky search"),
            Self::L1WidePullIn => write!(f, "L1 wide pull-in"),
            Self::L1NarrowPullIn => write!(f, "L1 narrow pull-in"),
            Self::L1PhaseLock => write!(f, "L1 phase lock"),
            Self::L1Reacquisition => write!(f, "L1 reacquisition"),
            Self::L1Steering => write!(f, "L1 steering"),
            Self::L1FrequencyLock => write!(f, "L1 frequency lock"),
            Self::L2Idle => write!(f, "L2 idle"),
            Self::L2PCodeAlign => write!(f, "L2 P-code alignment"),
            Self::L2Search => write!(f, "L2 search"),
            Self::L2PhaseLock => write!(f, "L2 phase lock"),
            Self::L2Steering => write!(f, "L2 steering"),
            Self::Unknown(state) => write!(f, "state #{}", state),
        }
    }
}

/// Correlator spacing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Correlator {
    NotApplicable,
    Standard,
    Narrow,
    Reserved,
    /// Pulse Aperture Correlator
    PAC,
    Unknown(u8),
}

impl From<u8> for Correlator {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::NotApplicable,
            1 => Self::Standard,
            2 => Self::Narrow,
            3 => Self::Reserved,
            4 => Self::PAC,
            value => Self::Unknown(value),
        }
    }
}

impl fmt::Display for Correlator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => write!(f, "n/a"),
            Self::Standard => write!(f, "standard"),
            Self::Narrow => write!(f, "narrow"),
            Self::Reserved => write!(f, "reserved"),
            Self::PAC => write!(f, "PAC"),
            Self::Unknown(code) => write!(f, "correlator #{}", code),
        }
    }
}

/// Satellite system the channel is tracking
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SatelliteSystem {
    GPS,
    Glonass,
    SBAS,
    Other(u8),
}

impl From<u8> for SatelliteSystem {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GPS,
            1 => Self::Glonass,
            2 => Self::SBAS,
            value => Self::Other(value),
        }
    }
}

impl SatelliteSystem {
    /// Raw system code, as transmitted
    pub fn code(&self) -> u8 {
        match self {
            Self::GPS => 0,
            Self::Glonass => 1,
            Self::SBAS => 2,
            Self::Other(code) => *code,
        }
    }
}

/// Tracked signal
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignalType {
    /// L1 C/A (GPS, Glonass, SBAS)
    L1CA,
    /// L2 P (GPS, Glonass)
    L2P,
    /// L2 P semi-codeless: anti-spoofing is active
    L2PCodeless,
    /// GPS L5
    L5,
    /// GPS L2C
    L2C,
    Unknown(u8),
}

impl From<u8> for SignalType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::L1CA,
            5 => Self::L2P,
            9 => Self::L2PCodeless,
            14 => Self::L5,
            17 => Self::L2C,
            value => Self::Unknown(value),
        }
    }
}

impl SignalType {
    /// Raw signal code, as transmitted
    pub fn code(&self) -> u8 {
        match self {
            Self::L1CA => 0,
            Self::L2P => 5,
            Self::L2PCodeless => 9,
            Self::L5 => 14,
            Self::L2C => 17,
            Self::Unknown(code) => *code,
        }
    }

    /// True for P-code derived L2 tracking
    pub fn is_l2_p_code(&self) -> bool {
        matches!(self, Self::L2P | Self::L2PCodeless)
    }

    /// True when tracked under anti-spoofing
    pub fn is_anti_spoofed(&self) -> bool {
        matches!(self, Self::L2PCodeless)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1CA => write!(f, "L1 C/A"),
            Self::L2P => write!(f, "L2 P"),
            Self::L2PCodeless => write!(f, "L2 P(Y)"),
            Self::L5 => write!(f, "L5"),
            Self::L2C => write!(f, "L2C"),
            Self::Unknown(_) => write!(f, "signal #{}", self.code()),
        }
    }
}

/// Decoded channel tracking status
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Status {
    pub state: TrackingState,
    pub channel: u8,
    pub phase_lock: bool,
    pub parity_known: bool,
    pub code_locked: bool,
    pub correlator: Correlator,
    pub system: SatelliteSystem,
    pub grouped: bool,
    pub signal: SignalType,
    pub fec: bool,
    /// L1 (or L5) when set, L2 otherwise
    pub primary: bool,
    pub half_cycle_added: bool,
    pub prn_locked: bool,
    pub channel_forced: bool,
}

/// Consumes the status word, LSB first
struct Bits(u32);

impl Bits {
    fn take(&mut self, width: u32) -> u8 {
        let value = self.0 & ((1 << width) - 1);
        self.0 >>= width;
        value as u8
    }

    fn flag(&mut self) -> bool {
        self.take(1) > 0
    }
}

impl From<u32> for Status {
    fn from(word: u32) -> Self {
        let mut bits = Bits(word);

        let state = TrackingState::from(bits.take(5));
        let channel = bits.take(5);
        let phase_lock = bits.flag();
        let parity_known = bits.flag();
        let code_locked = bits.flag();
        let correlator = Correlator::from(bits.take(3));
        let system = SatelliteSystem::from(bits.take(3));
        let _ = bits.take(1); // reserved
        let grouped = bits.flag();
        let signal = SignalType::from(bits.take(5));
        let fec = bits.flag();
        let primary = bits.flag();
        let half_cycle_added = bits.flag();
        let _ = bits.take(1); // reserved
        let prn_locked = bits.flag();
        let channel_forced = bits.flag();

        Self {
            state,
            channel,
            phase_lock,
            parity_known,
            code_locked,
            correlator,
            system,
            grouped,
            signal,
            fec,
            primary,
            half_cycle_added,
            prn_locked,
            channel_forced,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ch#{} {} ({}, {} correlator)",
            self.channel, self.signal, self.state, self.correlator
        )?;

        let flags = [
            (self.phase_lock, "phase-lock"),
            (self.parity_known, "parity"),
            (self.code_locked, "code-lock"),
            (self.grouped, "grouped"),
            (self.fec, "fec"),
            (self.primary, "primary"),
            (self.half_cycle_added, "half-cycle"),
            (self.prn_locked, "prn-lock"),
            (self.channel_forced, "forced"),
        ];

        for (_, name) in flags.iter().filter(|(set, _)| *set) {
            write!(f, " {}", name)?;
        }

        Ok(())
    }
}

impl std::str::FromStr for Status {
    type Err = std::num::ParseIntError;

    /// Parses the hexadecimal status word
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = u32::from_str_radix(s.trim(), 16)?;
        Ok(Self::from(word))
    }
}
