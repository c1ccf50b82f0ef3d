//! Pre-built Test Fixtures
//!
//! Provides ready-to-use companies for payroll tests. These fixtures are
//! consistent and predictable; use the builders for anything bespoke.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::CompanyId;
use domain_payroll::Company;
use rust_decimal_macros::dec;

use crate::builders::TestCompanyBuilder;

/// Fixture for payroll test data
pub struct PayrollFixtures;

impl PayrollFixtures {
    /// An id no fixture uses
    pub const MISSING_COMPANY_ID: CompanyId = CompanyId::new(999);

    /// Company 1 with two employees earning 1000.00 and 2000.00
    pub fn acme() -> Company {
        TestCompanyBuilder::new()
            .with_id(1)
            .with_name("Acme")
            .with_salaries(&[dec!(1000.00), dec!(2000.00)])
            .build()
    }

    /// Company 2 with three employees, used to check raises stay scoped to
    /// their own company
    pub fn globex() -> Company {
        TestCompanyBuilder::new()
            .with_id(2)
            .with_name("Globex")
            .with_salaries(&[dec!(1500.00), dec!(2500.50), dec!(0.05)])
            .build()
    }

    /// Company 3 with no employees
    pub fn empty() -> Company {
        TestCompanyBuilder::new().with_id(3).with_name("Shell Co").build()
    }

    /// All fixture companies
    pub fn all() -> Vec<Company> {
        vec![Self::acme(), Self::globex(), Self::empty()]
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed instant used with `FixedClock`
    pub fn raise_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    /// A previous raise, for companies that already have history
    pub fn previous_raise() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap()
    }
}
