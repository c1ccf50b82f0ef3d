//! Company repository implementation
//!
//! This module provides database access for companies and their employees,
//! including the two bulk salary statements used by the bulk update
//! strategies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use core_kernel::{CompanyId, EmployeeId, RaiseRate, Salary};
use domain_payroll::{Company, Employee};

use crate::error::DatabaseError;

/// The bulk raise statement used by the bound-parameter strategy
pub const BULK_RAISE_SQL: &str = "UPDATE employees SET salary = salary * $1 WHERE company_id = $2";

/// Repository for companies and their employees
///
/// Holds no connection of its own: every query runs on the connection or
/// transaction the caller passes in, so one request uses one handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyRepository;

impl CompanyRepository {
    pub fn new() -> Self {
        Self
    }

    /// Loads a company row without its employees
    ///
    /// # Returns
    ///
    /// `None` if no company has the given id
    #[instrument(skip(self, conn))]
    pub async fn find_company(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
    ) -> Result<Option<CompanyRow>, DatabaseError> {
        let company = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, last_salary_update_utc
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(company_id.value())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(company)
    }

    /// Loads a company together with all of its employees in one query
    ///
    /// # Returns
    ///
    /// `None` if no company has the given id
    #[instrument(skip(self, conn))]
    pub async fn find_company_with_employees(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
    ) -> Result<Option<Company>, DatabaseError> {
        let rows = sqlx::query_as::<_, CompanyEmployeeRow>(
            r#"
            SELECT
                c.id AS company_id,
                c.name AS company_name,
                c.last_salary_update_utc,
                e.id AS employee_id,
                e.name AS employee_name,
                e.salary
            FROM companies c
            LEFT JOIN employees e ON e.company_id = c.id
            WHERE c.id = $1
            ORDER BY e.id
            "#,
        )
        .bind(company_id.value())
        .fetch_all(&mut *conn)
        .await?;

        debug!(rows = rows.len(), "Loaded company graph");
        CompanyEmployeeRow::into_company(rows)
    }

    /// Multiplies every salary of a company in one statement built with the
    /// query builder
    ///
    /// Runs immediately on `conn`; atomicity with other writes is the
    /// caller's transaction.
    ///
    /// # Returns
    ///
    /// The number of employee rows updated
    #[instrument(skip(self, conn))]
    pub async fn bulk_raise_interpolated(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
        rate: RaiseRate,
    ) -> Result<u64, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE employees SET salary = salary * ");
        builder.push_bind(rate.multiplier());
        builder.push(" WHERE company_id = ");
        builder.push_bind(company_id.value());

        let result = builder.build().execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Multiplies every salary of a company with the fixed
    /// [`BULK_RAISE_SQL`] statement and bound parameters
    ///
    /// Runs immediately on `conn`; atomicity with other writes is the
    /// caller's transaction.
    ///
    /// # Returns
    ///
    /// The number of employee rows updated
    #[instrument(skip(self, conn))]
    pub async fn bulk_raise_bound(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
        rate: RaiseRate,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(BULK_RAISE_SQL)
            .bind(rate.multiplier())
            .bind(company_id.value())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Database row for a company
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRow {
    pub id: i32,
    pub name: String,
    pub last_salary_update_utc: Option<DateTime<Utc>>,
}

impl CompanyRow {
    /// Converts to a company with no employees loaded
    pub fn into_company(self) -> Company {
        Company {
            id: CompanyId::new(self.id),
            name: self.name,
            employees: Vec::new(),
            last_salary_update_utc: self.last_salary_update_utc,
        }
    }
}

/// One row of the company/employee join; employee columns are `NULL` for a
/// company without employees
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyEmployeeRow {
    pub company_id: i32,
    pub company_name: String,
    pub last_salary_update_utc: Option<DateTime<Utc>>,
    pub employee_id: Option<i32>,
    pub employee_name: Option<String>,
    pub salary: Option<Decimal>,
}

impl CompanyEmployeeRow {
    /// Folds join rows into a single company aggregate
    pub fn into_company(rows: Vec<CompanyEmployeeRow>) -> Result<Option<Company>, DatabaseError> {
        let mut rows = rows.into_iter().peekable();
        let Some(first) = rows.peek() else {
            return Ok(None);
        };

        let mut company = Company {
            id: CompanyId::new(first.company_id),
            name: first.company_name.clone(),
            employees: Vec::new(),
            last_salary_update_utc: first.last_salary_update_utc,
        };

        for row in rows {
            if let (Some(id), Some(name), Some(salary)) = (row.employee_id, row.employee_name, row.salary) {
                company.add_employee(Employee::new(
                    EmployeeId::new(id),
                    company.id,
                    name,
                    Salary::new(salary)?,
                ));
            }
        }

        Ok(Some(company))
    }
}
