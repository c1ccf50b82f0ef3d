//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating companies and raise rates
//! that respect the domain invariants.

use core_kernel::RaiseRate;
use domain_payroll::Company;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::TestCompanyBuilder;

/// Strategy for salaries in cents, up to 10 000 000.00
pub fn salary_cents_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Strategy for valid salary amounts
pub fn salary_strategy() -> impl Strategy<Value = Decimal> {
    salary_cents_strategy().prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for raise rates between a 50% cut and a 100% raise, in 0.01% steps
pub fn raise_rate_strategy() -> impl Strategy<Value = RaiseRate> {
    (5_000i64..=20_000i64).prop_map(|basis| {
        RaiseRate::new(Decimal::new(basis, 4)).expect("strategy only yields positive rates")
    })
}

/// Strategy for companies with up to `max_employees` employees
pub fn company_strategy(max_employees: usize) -> impl Strategy<Value = Company> {
    (1i32..500i32, proptest::collection::vec(salary_strategy(), 0..=max_employees)).prop_map(
        |(id, salaries)| {
            TestCompanyBuilder::new()
                .with_id(id)
                .with_name(format!("Company {}", id))
                .with_salaries(&salaries)
                .build()
        },
    )
}
