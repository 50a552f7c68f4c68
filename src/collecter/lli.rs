//! Loss of lock indicator (LLI)
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
    pub struct LliFlags: u8 {
        /// Lock lost between previous and current observation,
        /// cycle slip is possible
        const LOCK_LOSS = 0x01;
        /// Observed under anti-spoofing (semi-codeless tracking)
        const UNDER_ANTI_SPOOFING = 0x04;
    }
}
