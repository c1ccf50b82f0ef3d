//! Tests for the company aggregate and the raise operation

use chrono::{TimeZone, Utc};
use core_kernel::{CompanyId, EmployeeId, RaiseRate, Salary};
use domain_payroll::{Company, Employee, UpdateStrategy};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn company_with_salaries(cents: &[u32]) -> Company {
    let id = CompanyId::new(1);
    cents.iter().enumerate().fold(Company::new(id, "Generated"), |company, (i, c)| {
        company.with_employee(Employee::new(
            EmployeeId::new(i as i32 + 1),
            id,
            format!("Employee {}", i + 1),
            Salary::from_cents(*c),
        ))
    })
}

mod raises {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let mut company = company_with_salaries(&[100_000, 200_000]);
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();

        company.apply_raise(RaiseRate::default(), at).unwrap();

        assert_eq!(company.salaries(), vec![dec!(1100.00), dec!(2200.00)]);
        assert_eq!(company.last_salary_update_utc, Some(at));
    }

    #[test]
    fn test_second_raise_compounds() {
        let mut company = company_with_salaries(&[100_000]);
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();

        company.apply_raise(RaiseRate::default(), at).unwrap();
        company.apply_raise(RaiseRate::default(), at).unwrap();

        assert_eq!(company.salaries(), vec![dec!(1210.00)]);
    }

    #[test]
    fn test_employee_lookup() {
        let company = company_with_salaries(&[100, 200]);
        assert_eq!(
            company.employee(EmployeeId::new(2)).map(|e| e.salary.amount()),
            Some(dec!(2.00))
        );
        assert!(company.employee(EmployeeId::new(3)).is_none());
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_strategy_serializes_snake_case() {
        let json = serde_json::to_string(&UpdateStrategy::InterpolatedSql).unwrap();
        assert_eq!(json, "\"interpolated_sql\"");
    }

    #[test]
    fn test_company_roundtrips_through_json() {
        let company = company_with_salaries(&[123_456]);
        let json = serde_json::to_string(&company).unwrap();
        let back: Company = serde_json::from_str(&json).unwrap();
        assert_eq!(back, company);
    }
}

proptest! {
    #[test]
    fn prop_aggregate_raise_matches_per_salary_raise(
        cents in proptest::collection::vec(0u32..10_000_000u32, 0..20),
        percent in 0u32..100u32,
    ) {
        let rate = RaiseRate::from_percent(Decimal::from(percent)).unwrap();
        let mut company = company_with_salaries(&cents);
        let expected: Vec<Decimal> = cents
            .iter()
            .map(|c| Salary::from_cents(*c).raised_by(rate).unwrap().amount())
            .collect();

        let updated = company.apply_raise(rate, Utc::now()).unwrap();

        prop_assert_eq!(updated as usize, cents.len());
        prop_assert_eq!(company.salaries(), expected);
    }
}
