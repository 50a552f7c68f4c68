use hifitime::prelude::{Duration, Epoch};
use log::{info, warn};

use crate::{error::ParsingError, range::RangeEpoch};

/// Session statistics
#[derive(Debug, Default, Clone)]
pub struct Runtime {
    /// Lines read
    pub lines: usize,

    /// RANGEA messages decoded
    pub decoded: usize,

    /// Messages dropped on checksum mismatch
    pub checksum_failures: usize,

    /// Messages dropped because malformed
    pub malformed: usize,

    /// Decoded messages without any retained record
    pub empty_epochs: usize,

    /// First decoded [Epoch]
    pub first_epoch: Option<Epoch>,

    /// Latest decoded [Epoch]
    pub epoch: Option<Epoch>,

    /// Covered time span, as [Duration]
    pub span: Duration,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_line(&mut self) {
        self.lines += 1;
    }

    /// Latch a newly decoded [RangeEpoch]
    pub fn new_epoch(&mut self, epoch: &RangeEpoch) {
        self.decoded += 1;

        if epoch.is_empty() {
            self.empty_epochs += 1;
        }

        if let Some(latest) = self.epoch {
            if epoch.epoch < latest {
                warn!("{} - epoch is older than {}", epoch.epoch, latest);
            }
        }

        let first = *self.first_epoch.get_or_insert(epoch.epoch);

        self.epoch = Some(epoch.epoch);
        self.span = epoch.epoch - first;
    }

    pub fn new_error(&mut self, error: &ParsingError) {
        match error {
            ParsingError::ChecksumMismatch => self.checksum_failures += 1,
            _ => self.malformed += 1,
        }
    }

    /// Reports session statistics
    pub fn summary(&self) {
        info!(
            "{} lines read, {} RANGEA messages decoded ({} empty)",
            self.lines, self.decoded, self.empty_epochs
        );

        if self.checksum_failures > 0 || self.malformed > 0 {
            info!(
                "{} messages dropped: {} checksum failures, {} malformed",
                self.checksum_failures + self.malformed,
                self.checksum_failures,
                self.malformed
            );
        }

        if let (Some(first), Some(last)) = (self.first_epoch, self.epoch) {
            info!("{} - {} ({})", first, last, self.span);
        }
    }
}
