//! Per-chunk hold durations
//!
//! The hold grows with the size of the request in three tiers so that
//! nominal, elevated and runaway pool pressure can each be reproduced by
//! choosing the requested row count alone.

use std::time::Duration;

/// Tier boundaries and durations for [`DelayShaper`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayProfile {
    /// Hold for requests below `elevated_from_chunks`
    pub base: Duration,
    /// Hold for elevated requests, and the floor of runaway holds
    pub elevated: Duration,
    pub elevated_from_chunks: usize,
    pub runaway_from_chunks: usize,
    /// Runaway holds add `escalation_step * chunk_index²`
    pub escalation_step: Duration,
}

impl Default for DelayProfile {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(2),
            elevated: Duration::from_millis(5),
            elevated_from_chunks: 10,
            runaway_from_chunks: 19,
            escalation_step: Duration::from_millis(2),
        }
    }
}

/// Pool pressure tier selected by a request's chunk count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayTier {
    Nominal,
    Elevated,
    Runaway,
}

impl std::fmt::Display for DelayTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelayTier::Nominal => write!(f, "nominal"),
            DelayTier::Elevated => write!(f, "elevated"),
            DelayTier::Runaway => write!(f, "runaway"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DelayShaper {
    profile: DelayProfile,
}

impl DelayShaper {
    pub fn new(profile: DelayProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DelayProfile {
        &self.profile
    }

    pub fn tier(&self, total_chunks: usize) -> DelayTier {
        if total_chunks >= self.profile.runaway_from_chunks {
            DelayTier::Runaway
        } else if total_chunks >= self.profile.elevated_from_chunks {
            DelayTier::Elevated
        } else {
            DelayTier::Nominal
        }
    }

    /// How long chunk `chunk_index` of a `total_chunks` request holds its connection
    pub fn delay(&self, chunk_index: usize, total_chunks: usize) -> Duration {
        match self.tier(total_chunks) {
            DelayTier::Nominal => self.profile.base,
            DelayTier::Elevated => self.profile.elevated,
            DelayTier::Runaway => {
                let squared = u32::try_from(chunk_index.saturating_mul(chunk_index))
                    .unwrap_or(u32::MAX);
                self.profile
                    .elevated
                    .saturating_add(self.profile.escalation_step.saturating_mul(squared))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_requests_use_constant_base_delay() {
        let shaper = DelayShaper::default();
        for index in 0..5 {
            assert_eq!(shaper.delay(index, 5), Duration::from_millis(2));
        }
        assert_eq!(shaper.tier(5), DelayTier::Nominal);
        assert_eq!(shaper.delay(0, 1), Duration::from_millis(2));
    }

    #[test]
    fn test_elevated_requests_use_larger_constant_delay() {
        let shaper = DelayShaper::default();
        let nominal = shaper.delay(0, 5);
        for index in 0..15 {
            assert_eq!(shaper.delay(index, 15), Duration::from_millis(5));
            assert!(shaper.delay(index, 15) > nominal);
        }
        assert_eq!(shaper.tier(10), DelayTier::Elevated);
        assert_eq!(shaper.tier(18), DelayTier::Elevated);
    }

    #[test]
    fn test_runaway_requests_escalate_quadratically() {
        let shaper = DelayShaper::default();
        let at_5 = shaper.delay(5, 25);
        let at_10 = shaper.delay(10, 25);
        let at_20 = shaper.delay(20, 25);

        assert!(at_5 < at_10 && at_10 < at_20);
        assert_eq!(at_5, Duration::from_millis(5 + 2 * 25));
        assert_eq!(at_10, Duration::from_millis(5 + 2 * 100));
        assert_eq!(at_20, Duration::from_millis(5 + 2 * 400));
    }

    #[test]
    fn test_runaway_tier_starts_at_nineteen_chunks() {
        let shaper = DelayShaper::default();
        assert_eq!(shaper.tier(19), DelayTier::Runaway);
        assert_eq!(shaper.tier(20), DelayTier::Runaway);
        assert_eq!(shaper.delay(0, 20), Duration::from_millis(5));
        assert_eq!(shaper.delay(19, 20), Duration::from_millis(5 + 2 * 361));

        let mut previous = Duration::ZERO;
        for index in 0..20 {
            let delay = shaper.delay(index, 20);
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn test_huge_index_saturates() {
        let shaper = DelayShaper::default();
        assert!(shaper.delay(usize::MAX, usize::MAX) > Duration::from_secs(1));
    }
}
