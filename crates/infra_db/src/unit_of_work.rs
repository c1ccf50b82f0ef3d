//! Snapshot-based change tracking
//!
//! An entity loaded from the store is attached to a [`Tracked`] wrapper that
//! keeps the loaded snapshot next to the live value. Mutations are made in
//! memory; [`Tracked::save_changes`] diffs the two and writes only what
//! changed, all inside one transaction.
//!
//! When the connection is already inside a transaction the flush runs as a
//! savepoint of it, so the caller's commit or rollback decides the outcome.

use chrono::{DateTime, Utc};
use sqlx::{Connection, PgConnection};
use tracing::{debug, instrument};

use core_kernel::{CompanyId, EmployeeId, Salary};
use domain_payroll::Company;

use crate::error::DatabaseError;

/// A single row-level write produced by diffing a tracked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChange {
    EmployeeSalary {
        company_id: CompanyId,
        employee_id: EmployeeId,
        salary: Salary,
    },
    CompanyTimestamp {
        company_id: CompanyId,
        at: DateTime<Utc>,
    },
}

impl PendingChange {
    async fn apply(&self, conn: &mut PgConnection) -> Result<(), DatabaseError> {
        let (rows, what) = match *self {
            PendingChange::EmployeeSalary { company_id, employee_id, salary } => {
                let result = sqlx::query(
                    "UPDATE employees SET salary = $1 WHERE id = $2 AND company_id = $3",
                )
                .bind(salary.amount())
                .bind(employee_id.value())
                .bind(company_id.value())
                .execute(&mut *conn)
                .await?;
                (result.rows_affected(), format!("employee {}", employee_id))
            }
            PendingChange::CompanyTimestamp { company_id, at } => {
                let result = sqlx::query(
                    "UPDATE companies SET last_salary_update_utc = $1 WHERE id = $2",
                )
                .bind(at)
                .bind(company_id.value())
                .execute(&mut *conn)
                .await?;
                (result.rows_affected(), format!("company {}", company_id))
            }
        };

        if rows != 1 {
            return Err(DatabaseError::ConcurrencyConflict(format!(
                "expected to update 1 row for {}, updated {}",
                what, rows
            )));
        }
        Ok(())
    }
}

/// An entity plus the snapshot it was loaded as
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    original: T,
    current: T,
}

impl<T: Clone> Tracked<T> {
    /// Starts tracking an entity as it was just loaded
    pub fn attach(entity: T) -> Self {
        Self {
            original: entity.clone(),
            current: entity,
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.current
    }

    /// The state the entity was loaded in, or last saved as
    pub fn original(&self) -> &T {
        &self.original
    }

    /// Marks the live value as persisted
    pub fn accept_changes(&mut self) {
        self.original = self.current.clone();
    }

    pub fn into_inner(self) -> T {
        self.current
    }
}

impl Tracked<Company> {
    /// Row-level writes needed to bring the store in line with memory
    ///
    /// Employee changes come first, ordered by employee id, followed by the
    /// company row.
    pub fn pending_changes(&self) -> Vec<PendingChange> {
        let company_id = self.current.id;
        let mut changes: Vec<PendingChange> = Vec::new();

        let mut employees: Vec<_> = self.current.employees.iter().collect();
        employees.sort_by_key(|e| e.id);
        for employee in employees {
            let unchanged = self
                .original
                .employee(employee.id)
                .is_some_and(|before| before.salary == employee.salary);
            if !unchanged {
                changes.push(PendingChange::EmployeeSalary {
                    company_id,
                    employee_id: employee.id,
                    salary: employee.salary,
                });
            }
        }

        if self.current.last_salary_update_utc != self.original.last_salary_update_utc {
            if let Some(at) = self.current.last_salary_update_utc {
                changes.push(PendingChange::CompanyTimestamp { company_id, at });
            }
        }

        changes
    }

    pub fn has_changes(&self) -> bool {
        !self.pending_changes().is_empty()
    }

    /// Writes all pending changes atomically
    ///
    /// # Returns
    ///
    /// The number of rows written
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConcurrencyConflict` if a tracked row no
    /// longer exists; nothing from this flush is kept
    pub async fn save_changes(&mut self, conn: &mut PgConnection) -> Result<u64, DatabaseError> {
        self.save_changes_with(conn, || Ok(())).await
    }

    /// Like [`Tracked::save_changes`], running `before_commit` after the last
    /// write and before the flush commits
    ///
    /// An error from `before_commit` rolls the flush back.
    #[instrument(skip_all, fields(company_id = %self.current.id))]
    pub async fn save_changes_with<F>(
        &mut self,
        conn: &mut PgConnection,
        before_commit: F,
    ) -> Result<u64, DatabaseError>
    where
        F: FnOnce() -> Result<(), DatabaseError> + Send,
    {
        let changes = self.pending_changes();
        if changes.is_empty() {
            debug!("No tracked changes to save");
            return Ok(0);
        }

        let mut tx = conn.begin().await?;
        for change in &changes {
            change.apply(&mut tx).await?;
        }
        before_commit()?;
        tx.commit().await?;

        self.accept_changes();
        debug!(rows = changes.len(), "Tracked changes saved");
        Ok(changes.len() as u64)
    }
}
