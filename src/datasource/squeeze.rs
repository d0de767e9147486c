//! Memory reclamation policy for sorted point stores.
//!
//! A store keeps unused slots in front of its live records (for prepends) and
//! behind them (the slack of the backing vector, for appends). After removals
//! the policy decides whether either pool has grown large enough to release.
//! The thresholds are deliberately asymmetric to the vector's doubling growth
//! so that a squeeze is not undone by the next append and vice versa.

/// Tuning for automatic squeezing after removals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SqueezePolicy {
    /// Run the policy after every removal.
    pub enabled: bool,
    /// Allocations at or below this many elements are never squeezed.
    pub min_allocation: usize,
    /// Allocations above this many elements use the large thresholds.
    pub large_allocation: usize,
    /// Small allocations release the tail when `post > factor * live`.
    pub small_post_factor: f64,
    /// Small allocations release the front when `pre > factor * live`.
    pub small_pre_factor: f64,
    /// Large allocations release the tail when `post > factor * live`.
    pub large_post_factor: f64,
    /// Large allocations release the front when `pre * divisor > live`.
    pub large_pre_divisor: f64,
}

impl Default for SqueezePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_allocation: 1000,
            large_allocation: 650_000,
            small_post_factor: 5.0,
            small_pre_factor: 1.5,
            large_post_factor: 1.5,
            large_pre_divisor: 10.0,
        }
    }
}

impl SqueezePolicy {
    /// Policy that never squeezes automatically.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Decide which pools to release for the given allocation.
    pub fn evaluate(&self, stats: AllocationStats) -> SqueezeRequest {
        let live = stats.live as f64;
        let pre = stats.pre_allocation as f64;
        let post = stats.post_allocation() as f64;

        if stats.total > self.large_allocation {
            SqueezeRequest {
                pre_allocation: pre * self.large_pre_divisor > live,
                post_allocation: post > live * self.large_post_factor,
            }
        } else if stats.total > self.min_allocation {
            SqueezeRequest {
                pre_allocation: pre > live * self.small_pre_factor,
                post_allocation: post > live * self.small_post_factor,
            }
        } else {
            SqueezeRequest::default()
        }
    }
}

/// Snapshot of how a store's backing allocation is split up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationStats {
    /// Total allocated element slots.
    pub total: usize,
    /// Records in the live zone.
    pub live: usize,
    /// Unused slots reserved in front of the live zone.
    pub pre_allocation: usize,
}

impl AllocationStats {
    /// Unused slots behind the live zone.
    pub fn post_allocation(&self) -> usize {
        self.total
            .saturating_sub(self.live)
            .saturating_sub(self.pre_allocation)
    }
}

/// Pools selected for release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SqueezeRequest {
    /// Release the pre-allocation pool.
    pub pre_allocation: bool,
    /// Release the post-allocation pool.
    pub post_allocation: bool,
}

impl SqueezeRequest {
    /// Check whether anything needs releasing.
    pub fn any(&self) -> bool {
        self.pre_allocation || self.post_allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: usize, live: usize, pre_allocation: usize) -> AllocationStats {
        AllocationStats {
            total,
            live,
            pre_allocation,
        }
    }

    #[test]
    fn small_allocations_are_left_alone() {
        let policy = SqueezePolicy::default();
        let request = policy.evaluate(stats(1000, 1, 900));
        assert!(!request.any());
    }

    #[test]
    fn small_regime_pre_allocation_below_threshold() {
        // 400 > 1.5 * 2000 does not hold
        let policy = SqueezePolicy::default();
        let request = policy.evaluate(stats(2400, 2000, 400));
        assert!(!request.pre_allocation);
        assert!(!request.post_allocation);
    }

    #[test]
    fn small_regime_pre_allocation_above_threshold() {
        let policy = SqueezePolicy::default();
        let request = policy.evaluate(stats(5000, 1000, 1600));
        assert!(request.pre_allocation);
        // 2400 tail slots <= 5 * 1000
        assert!(!request.post_allocation);
    }

    #[test]
    fn small_regime_post_allocation_above_threshold() {
        let policy = SqueezePolicy::default();
        let request = policy.evaluate(stats(4096, 500, 0));
        assert!(request.post_allocation);
        assert!(!request.pre_allocation);
    }

    #[test]
    fn large_regime_uses_tighter_thresholds() {
        let policy = SqueezePolicy::default();
        // pre: 50_001 * 10 > 500_000, post: 100_000 <= 1.5 * 500_000
        let request = policy.evaluate(stats(650_001, 500_000, 50_001));
        assert!(request.pre_allocation);
        assert!(!request.post_allocation);

        let request = policy.evaluate(stats(1_000_000, 300_000, 0));
        assert!(request.post_allocation);
        assert!(!request.pre_allocation);

        // the same proportions stay untouched in the small regime
        let request = policy.evaluate(stats(6500, 5000, 501));
        assert!(!request.any());
    }

    #[test]
    fn post_allocation_excludes_front_pool() {
        assert_eq!(stats(100, 40, 10).post_allocation(), 50);
        assert_eq!(stats(10, 40, 10).post_allocation(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_fills_defaults() {
        let policy: SqueezePolicy = serde_json::from_str(r#"{ "enabled": false }"#).unwrap();
        assert!(!policy.enabled);
        assert_eq!(policy.large_allocation, 650_000);
    }
}
