use serde::{Deserialize, Serialize};

/// Quality tier ordinal: 0 is highest fidelity, 5 is lowest.
///
/// The tier parametrizes update cadence and distance thresholds in the
/// shadow throttle and the culling pass. It carries no state of its own
/// beyond the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityTier(u8);

impl QualityTier {
    /// Highest-fidelity tier.
    pub const HIGHEST: QualityTier = QualityTier(0);
    /// Lowest-fidelity tier.
    pub const LOWEST: QualityTier = QualityTier(5);

    /// Build a tier from an index, clamping to the valid 0..=5 range.
    pub fn from_index(index: u8) -> Self {
        Self(index.min(5))
    }

    /// The tier index (0..=5).
    pub fn index(self) -> u8 {
        self.0
    }

    /// Iterate all tiers from highest to lowest fidelity.
    pub fn all() -> impl Iterator<Item = QualityTier> {
        (0..=5).map(QualityTier)
    }
}

impl Default for QualityTier {
    fn default() -> Self {
        Self::HIGHEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_clamps() {
        assert_eq!(QualityTier::from_index(0), QualityTier::HIGHEST);
        assert_eq!(QualityTier::from_index(5), QualityTier::LOWEST);
        assert_eq!(QualityTier::from_index(200), QualityTier::LOWEST);
    }

    #[test]
    fn test_ordering_follows_index() {
        assert!(QualityTier::HIGHEST < QualityTier::LOWEST);
        let tiers: Vec<u8> = QualityTier::all().map(QualityTier::index).collect();
        assert_eq!(tiers, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_serde_transparent() {
        let tier = QualityTier::from_index(3);
        let ron_str = ron::to_string(&tier).unwrap();
        assert_eq!(ron_str, "3");
        let back: QualityTier = ron::from_str(&ron_str).unwrap();
        assert_eq!(back, tier);
    }
}
