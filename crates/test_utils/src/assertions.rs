//! Custom Test Assertions
//!
//! Provides assertion helpers for payroll state that give more meaningful
//! failure messages than bare `assert_eq!`.

use chrono::{DateTime, Utc};
use core_kernel::{truncate_to_micros, RaiseRate};
use domain_payroll::Company;
use rust_decimal::Decimal;

/// Asserts a company's salaries, in employee id order
pub fn assert_salaries_eq(company: &Company, expected: &[Decimal]) {
    let actual = company.salaries();
    assert_eq!(
        actual, expected,
        "Salaries of company {} differ: actual={:?}, expected={:?}",
        company.id, actual, expected
    );
}

/// Asserts that `after` is `before` with every salary raised once by `rate`
/// and everything except salaries and the timestamp unchanged
pub fn assert_raised_once(before: &Company, after: &Company, rate: RaiseRate) {
    assert_eq!(before.id, after.id, "Comparing different companies");
    assert_eq!(before.name, after.name, "Company name changed");
    assert_eq!(
        before.employees.len(),
        after.employees.len(),
        "Employee count changed"
    );

    let expected: Vec<Decimal> = {
        let mut employees: Vec<_> = before.employees.iter().collect();
        employees.sort_by_key(|e| e.id);
        employees
            .into_iter()
            .map(|e| e.salary.raised_by(rate).expect("raise overflowed").amount())
            .collect()
    };
    assert_salaries_eq(after, &expected);
    assert!(
        after.last_salary_update_utc.is_some(),
        "Company {} was not stamped",
        after.id
    );
}

/// Asserts that a company is exactly as it was (no salary or timestamp change)
pub fn assert_untouched(before: &Company, after: &Company) {
    assert_eq!(
        before, after,
        "Company {} changed but should not have",
        before.id
    );
}

/// Asserts that the company was stamped no earlier than `started`
///
/// `started` is truncated to the store's microsecond precision first.
pub fn assert_stamped_since(company: &Company, started: DateTime<Utc>) {
    let stamped = company
        .last_salary_update_utc
        .unwrap_or_else(|| panic!("Company {} has no salary update timestamp", company.id));
    let started = truncate_to_micros(started);
    assert!(
        stamped >= started,
        "Company {} stamped at {} which is before the request started at {}",
        company.id,
        stamped,
        started
    );
}
