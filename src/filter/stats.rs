use fixed::types::U32F32;

/// Accepted touches versus water-like rejections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: u32,
    pub rejected: u32,
}

impl FilterStats {
    pub(crate) fn record_accepted(&mut self) {
        self.accepted = self.accepted.saturating_add(1);
    }

    pub(crate) fn record_rejected(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u64 {
        u64::from(self.accepted) + u64::from(self.rejected)
    }

    /// Share of rejected touches in percent, zero before any decision.
    pub fn rejection_rate_percent(&self) -> U32F32 {
        let total = self.total();
        if total == 0 {
            return U32F32::ZERO;
        }
        let bits = (u128::from(self.rejected) * 100 << 32) / u128::from(total);
        U32F32::from_bits(bits as u64)
    }
}
