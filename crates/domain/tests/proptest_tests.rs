//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{FractionalPercent, MaxFaults, StatusCode};
use proptest::prelude::*;

// ============================================================================
// FractionalPercent Property Tests
// ============================================================================

mod fractional_percent_tests {
    use super::*;

    proptest! {
        #[test]
        fn clamped_numerator_never_exceeds_denominator(
            numerator in any::<u32>(),
            denominator in any::<u32>()
        ) {
            let pct = FractionalPercent::clamped(numerator, denominator);
            prop_assert!(pct.numerator() <= pct.denominator());
            prop_assert_eq!(pct.denominator(), denominator);
        }

        #[test]
        fn ratio_is_within_unit_interval(
            numerator in any::<u32>(),
            denominator in any::<u32>()
        ) {
            let ratio = FractionalPercent::clamped(numerator, denominator).ratio();
            prop_assert!((0.0..=1.0).contains(&ratio));
        }

        #[test]
        fn new_accepts_exactly_valid_fractions(
            numerator in 0u32..2_000,
            denominator in 0u32..1_000
        ) {
            let result = FractionalPercent::new(numerator, denominator);
            prop_assert_eq!(result.is_ok(), numerator <= denominator);
        }

        #[test]
        fn zero_denominator_is_never(numerator in any::<u32>()) {
            prop_assert!(FractionalPercent::clamped(numerator, 0).is_never());
        }
    }
}

// ============================================================================
// MaxFaults Property Tests
// ============================================================================

mod max_faults_tests {
    use super::*;

    proptest! {
        #[test]
        fn limited_admits_iff_below(max in 0u32..10_000, active in 0u32..10_000) {
            prop_assert_eq!(MaxFaults::limited(max).admits(active), active < max);
        }

        #[test]
        fn unlimited_always_admits(active in any::<u32>()) {
            prop_assert!(MaxFaults::UNLIMITED.admits(active));
        }
    }
}

// ============================================================================
// StatusCode Property Tests
// ============================================================================

mod status_code_tests {
    use super::*;

    proptest! {
        #[test]
        fn from_code_accepts_only_canonical_range(code in -100i32..100) {
            let parsed = StatusCode::from_code(code);
            prop_assert_eq!(parsed.is_some(), (0..=16).contains(&code));
            if let Some(status) = parsed {
                prop_assert_eq!(status.code(), code);
                prop_assert_eq!(status.to_string().parse::<StatusCode>(), Ok(status));
            }
        }
    }
}
