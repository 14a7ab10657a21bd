use terrella_config::QualityTier;

/// Shadow update cadence per quality tier: tiers 0–1 refresh every frame
/// (throttle disabled), tiers 2–5 skip progressively more frames.
const TIER_INTERVALS: [u32; 6] = [1, 1, 2, 3, 4, 6];

/// Decides, once per frame, whether shadow maps should be recomputed.
#[derive(Clone, Debug)]
pub struct ShadowThrottle {
    enabled: bool,
    interval: u32,
    frame: u32,
    force_update: bool,
}

impl ShadowThrottle {
    /// Throttle configured for the given quality tier.
    pub fn for_tier(tier: QualityTier) -> Self {
        let interval = TIER_INTERVALS[tier.index() as usize];
        Self {
            enabled: interval > 1,
            interval,
            frame: 0,
            force_update: false,
        }
    }

    /// The configured update interval in frames.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Whether throttling is active at all for this tier.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Request an update on the next frame regardless of cadence. The only
    /// cross-frame signal in the system; consumed by the next
    /// [`ShadowThrottle::begin_frame`].
    pub fn force_next_update(&mut self) {
        self.force_update = true;
    }

    /// Advance the frame counter and report whether shadow maps should be
    /// recomputed this frame.
    ///
    /// True when throttling is disabled, when a forced update is pending
    /// (consumed here), or when the counter lands on the cadence.
    pub fn begin_frame(&mut self) -> bool {
        let update = if !self.enabled {
            true
        } else if self.force_update {
            self.force_update = false;
            true
        } else {
            self.frame % self.interval == 0
        };
        self.frame = self.frame.wrapping_add(1);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_fidelity_tiers_update_every_frame() {
        for tier in [0, 1] {
            let mut throttle = ShadowThrottle::for_tier(QualityTier::from_index(tier));
            assert!(!throttle.is_enabled());
            for _ in 0..10 {
                assert!(throttle.begin_frame(), "tier {tier} must never skip");
            }
        }
    }

    #[test]
    fn test_tier_cadence_pattern() {
        let mut throttle = ShadowThrottle::for_tier(QualityTier::from_index(2));
        assert!(throttle.is_enabled());
        assert_eq!(throttle.interval(), 2);
        let pattern: Vec<bool> = (0..6).map(|_| throttle.begin_frame()).collect();
        assert_eq!(pattern, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_intervals_monotone_in_tier() {
        let intervals: Vec<u32> = QualityTier::all()
            .map(|t| ShadowThrottle::for_tier(t).interval())
            .collect();
        for pair in intervals.windows(2) {
            assert!(
                pair[1] >= pair[0],
                "lower fidelity must not update more often: {intervals:?}"
            );
        }
        assert_eq!(intervals, vec![1, 1, 2, 3, 4, 6]);
    }

    #[test]
    fn test_force_update_consumed_once() {
        let mut throttle = ShadowThrottle::for_tier(QualityTier::from_index(5));
        assert_eq!(throttle.interval(), 6);
        assert!(throttle.begin_frame()); // frame 0 on cadence
        assert!(!throttle.begin_frame()); // frame 1 skipped
        throttle.force_next_update();
        assert!(throttle.begin_frame(), "forced frame must update");
        assert!(!throttle.begin_frame(), "force flag consumed");
    }

    #[test]
    fn test_counter_wraps_without_panic() {
        let mut throttle = ShadowThrottle::for_tier(QualityTier::from_index(3));
        throttle.frame = u32::MAX;
        let _ = throttle.begin_frame();
        let _ = throttle.begin_frame();
    }
}
