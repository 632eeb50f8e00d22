//! Load-factor policy for a `ChainedHashTable`.

use crate::error::TableError;

/// Bucket count used by the default construction entry point.
pub const DEFAULT_BUCKET_COUNT: usize = 5;

/// Smallest bucket count the rehash engine computes, and the size
/// `remove_all` shrinks to.
pub const MIN_BUCKET_COUNT: usize = 5;

/// Ratios steering automatic rehashing.
///
/// The ratio compared against the thresholds is `len / bucket_count`.
///
/// - `ideal_ratio`: entries per bucket targeted by an automatic rehash.
/// - `lower_rehash_threshold`: `remove` rehashes when the ratio drops below
///   it. `0.0` disables the check.
/// - `upper_rehash_threshold`: `put` rehashes when the ratio exceeds it, but
///   only while `upper_rehash_threshold > ideal_ratio`. Setting it to `0.0`
///   therefore disables growth, as does any value at or below `ideal_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub ideal_ratio: f64,
    pub lower_rehash_threshold: f64,
    pub upper_rehash_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            ideal_ratio: 3.0,
            lower_rehash_threshold: 0.0,
            upper_rehash_threshold: 15.0,
        }
    }
}

impl TableConfig {
    pub fn with_ideal_ratio(mut self, ratio: f64) -> Self {
        self.ideal_ratio = ratio;
        self
    }

    pub fn with_lower_rehash_threshold(mut self, threshold: f64) -> Self {
        self.lower_rehash_threshold = threshold;
        self
    }

    pub fn with_upper_rehash_threshold(mut self, threshold: f64) -> Self {
        self.upper_rehash_threshold = threshold;
        self
    }

    /// Reject ratios the rehash engine cannot work with.
    pub fn validate(&self) -> Result<(), TableError> {
        if !(self.ideal_ratio.is_finite() && self.ideal_ratio > 0.0) {
            return Err(TableError::InvalidConfig(
                "ideal ratio must be finite and positive",
            ));
        }
        if !(self.lower_rehash_threshold.is_finite() && self.lower_rehash_threshold >= 0.0) {
            return Err(TableError::InvalidConfig(
                "lower rehash threshold must be finite and non-negative",
            ));
        }
        if self.upper_rehash_threshold.is_nan() {
            return Err(TableError::InvalidConfig(
                "upper rehash threshold must be a number",
            ));
        }
        Ok(())
    }

    /// Whether `put` checks the upper threshold at all.
    #[inline]
    pub(crate) fn grows(&self) -> bool {
        self.upper_rehash_threshold > self.ideal_ratio
    }

    /// Whether `remove` checks the lower threshold at all.
    #[inline]
    pub(crate) fn shrinks(&self) -> bool {
        self.lower_rehash_threshold > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TableConfig::default();
        assert_eq!(c.ideal_ratio, 3.0);
        assert_eq!(c.lower_rehash_threshold, 0.0);
        assert_eq!(c.upper_rehash_threshold, 15.0);
        assert!(c.grows());
        assert!(!c.shrinks());
        assert!(c.validate().is_ok());
    }

    /// Growth is gated on `upper > ideal`, not on `upper != 0`.
    #[test]
    fn growth_gate_compares_against_ideal_ratio() {
        let c = TableConfig::default().with_upper_rehash_threshold(3.0);
        assert!(!c.grows());
        let c = TableConfig::default().with_upper_rehash_threshold(0.0);
        assert!(!c.grows());
        let c = TableConfig::default()
            .with_ideal_ratio(0.5)
            .with_upper_rehash_threshold(1.0);
        assert!(c.grows());
    }

    #[test]
    fn validate_rejects_bad_ratios() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = TableConfig::default().with_ideal_ratio(bad);
            assert!(matches!(c.validate(), Err(TableError::InvalidConfig(_))));
        }
        let c = TableConfig::default().with_lower_rehash_threshold(-0.5);
        assert!(c.validate().is_err());
        let c = TableConfig::default().with_upper_rehash_threshold(f64::NAN);
        assert!(c.validate().is_err());
    }
}
