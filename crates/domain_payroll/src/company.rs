//! Company aggregate and its employees
//!
//! A company exclusively owns its employees. Employees carry a back
//! reference to their company for lookups only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, EmployeeId, MoneyError, RaiseRate, Salary};

/// An employee of a company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub company_id: CompanyId,
    pub name: String,
    pub salary: Salary,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        company_id: CompanyId,
        name: impl Into<String>,
        salary: Salary,
    ) -> Self {
        Self {
            id,
            company_id,
            name: name.into(),
            salary,
        }
    }
}

/// A company together with the employees it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub employees: Vec<Employee>,
    /// When salaries were last raised; `None` until the first raise
    pub last_salary_update_utc: Option<DateTime<Utc>>,
}

impl Company {
    /// Creates a company with no employees and no salary history
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            employees: Vec::new(),
            last_salary_update_utc: None,
        }
    }

    /// Adds an employee owned by this company
    ///
    /// The employee's company reference is overwritten with this company's id.
    pub fn add_employee(&mut self, mut employee: Employee) {
        employee.company_id = self.id;
        self.employees.push(employee);
    }

    /// Builder-style variant of [`Company::add_employee`]
    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.add_employee(employee);
        self
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Salaries in employee id order
    pub fn salaries(&self) -> Vec<Decimal> {
        let mut employees: Vec<&Employee> = self.employees.iter().collect();
        employees.sort_by_key(|e| e.id);
        employees.into_iter().map(|e| e.salary.amount()).collect()
    }

    /// Records the time of the latest salary update
    pub fn stamp_salary_update(&mut self, at: DateTime<Utc>) {
        self.last_salary_update_utc = Some(at);
    }

    /// Raises every employee's salary and stamps the company
    ///
    /// All new salaries are computed before any is assigned, so on error the
    /// company is left untouched.
    ///
    /// # Returns
    ///
    /// The number of employees whose salary was recomputed
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if any raised salary overflows
    pub fn apply_raise(&mut self, rate: RaiseRate, at: DateTime<Utc>) -> Result<u64, MoneyError> {
        let raised = self
            .employees
            .iter()
            .map(|e| e.salary.raised_by(rate))
            .collect::<Result<Vec<_>, _>>()?;

        for (employee, salary) in self.employees.iter_mut().zip(raised) {
            employee.salary = salary;
        }
        self.stamp_salary_update(at);

        Ok(self.employees.len() as u64)
    }
}
