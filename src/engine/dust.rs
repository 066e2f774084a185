use crate::model::NetEffect;

/// Drops transactions whose net effect is too small to be meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DustFilter {
    threshold_satoshis: u64,
}

impl DustFilter {
    pub fn new(threshold_satoshis: u64) -> Self {
        Self { threshold_satoshis }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold_satoshis
    }

    /// `|net| >= threshold`; the boundary itself is significant.
    /// A zero effect is never significant, even with a zero threshold.
    pub fn is_significant(
        &self,
        effect: &NetEffect,
    ) -> bool {
        effect.net_satoshis != 0 && effect.magnitude() >= self.threshold_satoshis
    }
}
