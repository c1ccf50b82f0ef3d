//! Unit tests for the salary and raise-rate types
//!
//! Tests cover construction, rounding, compounding raises, and the
//! non-negative salary invariant.

use core_kernel::{MoneyError, RaiseRate, Salary};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_two_decimal_places() {
        let s = Salary::new(dec!(100.125)).unwrap();
        assert_eq!(s.amount(), dec!(100.13));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Salary::from_cents(100_050).amount(), dec!(1000.50));
    }

    #[test]
    fn test_zero_is_valid() {
        assert_eq!(Salary::zero().amount(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let err = Salary::new(dec!(-1)).unwrap_err();
        assert!(matches!(err, MoneyError::InvalidAmount(_)));
    }

    #[test]
    fn test_display_has_two_decimals() {
        assert_eq!(Salary::new(dec!(5)).unwrap().to_string(), "5.00");
    }
}

mod raises {
    use super::*;

    #[test]
    fn test_default_rate_is_ten_percent() {
        assert_eq!(RaiseRate::default().multiplier(), dec!(1.1));
    }

    #[test]
    fn test_reference_salaries() {
        let rate = RaiseRate::default();
        let raised: Vec<Decimal> = [dec!(1000.00), dec!(2000.00)]
            .into_iter()
            .map(|amount| Salary::new(amount).unwrap().raised_by(rate).unwrap().amount())
            .collect();
        assert_eq!(raised, vec![dec!(1100.00), dec!(2200.00)]);
    }

    #[test]
    fn test_raises_compound() {
        let rate = RaiseRate::default();
        let once = Salary::new(dec!(1000.00)).unwrap().raised_by(rate).unwrap();
        let twice = once.raised_by(rate).unwrap();
        assert_eq!(twice.amount(), dec!(1210.00));
    }

    #[test]
    fn test_pay_cut_rate_is_allowed() {
        let rate = RaiseRate::new(dec!(0.5)).unwrap();
        let cut = Salary::new(dec!(100.00)).unwrap().raised_by(rate).unwrap();
        assert_eq!(cut.amount(), dec!(50.00));
    }

    #[test]
    fn test_rate_serde_roundtrip_rejects_zero() {
        let parsed: Result<RaiseRate, _> = serde_json::from_str("\"0\"");
        assert!(parsed.is_err());
    }
}

proptest! {
    #[test]
    fn prop_raise_never_produces_negative_salary(
        cents in 0u32..100_000_000u32,
        percent in 0u32..500u32,
    ) {
        let rate = RaiseRate::from_percent(Decimal::from(percent)).unwrap();
        let raised = Salary::from_cents(cents).raised_by(rate).unwrap();
        prop_assert!(raised.amount() >= Decimal::ZERO);
        prop_assert!(raised.amount() >= Salary::from_cents(cents).amount());
    }

    #[test]
    fn prop_raise_keeps_two_decimal_places(cents in 0u32..100_000_000u32) {
        let raised = Salary::from_cents(cents).raised_by(RaiseRate::default()).unwrap();
        prop_assert_eq!(raised.amount().scale(), 2);
    }
}
