//! Test Data Builders
//!
//! Provides builder patterns for constructing test companies with sensible
//! defaults. Tests specify only the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::{CompanyId, EmployeeId, Salary};
use domain_payroll::{Company, Employee};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

/// Employee ids are `company_id * EMPLOYEE_ID_STRIDE + n` so companies built
/// separately never collide when seeded into one database
pub const EMPLOYEE_ID_STRIDE: i32 = 1_000;

/// Builder for constructing test companies
pub struct TestCompanyBuilder {
    id: i32,
    name: String,
    salaries: Vec<Decimal>,
    last_salary_update_utc: Option<DateTime<Utc>>,
    random_names: bool,
}

impl Default for TestCompanyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCompanyBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: 1,
            name: "Test Company".to_string(),
            salaries: Vec::new(),
            last_salary_update_utc: None,
            random_names: false,
        }
    }

    /// Sets the company ID
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    /// Sets the company name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds one employee with the given salary
    pub fn with_salary(mut self, salary: Decimal) -> Self {
        self.salaries.push(salary);
        self
    }

    /// Adds one employee per salary
    pub fn with_salaries(mut self, salaries: &[Decimal]) -> Self {
        self.salaries.extend_from_slice(salaries);
        self
    }

    /// Adds `count` employees with random salaries between 20 000.00 and 200 000.00
    pub fn with_random_employees(mut self, count: usize) -> Self {
        for _ in 0..count {
            let cents: i64 = (2_000_000i64..20_000_000i64).fake();
            self.salaries.push(Decimal::new(cents, 2));
        }
        self.random_names = true;
        self
    }

    /// Sets the last salary update timestamp
    pub fn with_last_salary_update(mut self, at: DateTime<Utc>) -> Self {
        self.last_salary_update_utc = Some(at);
        self
    }

    /// Builds the company
    ///
    /// # Panics
    ///
    /// Panics if a salary is negative
    pub fn build(self) -> Company {
        let company_id = CompanyId::new(self.id);
        let mut company = Company::new(company_id, self.name);
        company.last_salary_update_utc = self.last_salary_update_utc;

        for (n, salary) in self.salaries.into_iter().enumerate() {
            let ordinal = n as i32 + 1;
            let name = if self.random_names {
                Name().fake::<String>()
            } else {
                format!("Employee {}", ordinal)
            };
            company.add_employee(Employee::new(
                EmployeeId::new(self.id * EMPLOYEE_ID_STRIDE + ordinal),
                company_id,
                name,
                Salary::new(salary).expect("test salaries must be non-negative"),
            ));
        }

        company
    }
}
