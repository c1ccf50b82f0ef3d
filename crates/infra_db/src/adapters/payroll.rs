//! PostgreSQL Payroll Adapter
//!
//! This module provides the database adapter for the payroll domain,
//! implementing `PayrollPort` with the three update strategies.
//!
//! # Connections
//!
//! A raise acquires one pooled connection up front and runs every read and
//! write of the request on it. The connection returns to the pool when the
//! request finishes, on success or failure.
//!
//! # Atomicity
//!
//! - **Object graph**: every write goes through one change-tracking flush,
//!   which is its own transaction.
//! - **Bulk statement**: the `UPDATE` executes the moment it is sent, not
//!   when tracked changes are flushed. The adapter therefore opens an
//!   explicit transaction before the statement; the timestamp flush joins
//!   it as a savepoint and the adapter commits both together. A
//!   `sqlx::Transaction` rolls back when dropped, so an error on any path
//!   before `commit` discards the salary update.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Connection, PgConnection, PgPool};
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, Clock, CompanyId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
    SystemClock,
};
use domain_payroll::{Company, FaultPoint, PayrollPort, RaiseOutcome, SalaryRaise, UpdateStrategy};

use crate::error::DatabaseError;
use crate::repositories::CompanyRepository;
use crate::unit_of_work::Tracked;

/// How a bulk raise phrases its single `UPDATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulkStatement {
    /// Composed with the query builder
    Interpolated,
    /// The fixed `BULK_RAISE_SQL` text with bound parameters
    Bound,
}

impl BulkStatement {
    /// `None` for the object graph, which issues per-row updates instead
    fn for_strategy(strategy: UpdateStrategy) -> Option<Self> {
        match strategy {
            UpdateStrategy::ObjectGraph => None,
            UpdateStrategy::InterpolatedSql => Some(BulkStatement::Interpolated),
            UpdateStrategy::BoundSql => Some(BulkStatement::Bound),
        }
    }
}

/// PostgreSQL-backed implementation of the PayrollPort trait
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - connection errors -> `PortError::Connection`
/// - constraint and concurrency errors -> `PortError::Conflict`
/// - other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresPayrollAdapter {
    repository: CompanyRepository,
    pool: PgPool,
    clock: Arc<dyn Clock>,
    fault: Option<FaultPoint>,
}

impl PostgresPayrollAdapter {
    /// Creates a new PostgreSQL payroll adapter using the system clock
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CompanyRepository::new(),
            pool,
            clock: Arc::new(SystemClock),
            fault: None,
        }
    }

    /// Replaces the clock used to stamp raises
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Makes every raise through this adapter fail at `point`
    ///
    /// Only meant for tests that prove a failed raise leaves no trace.
    pub fn with_fault(mut self, point: FaultPoint) -> Self {
        self.fault = Some(point);
        self
    }

    fn check_fault(&self, point: FaultPoint) -> Result<(), DatabaseError> {
        match self.fault {
            Some(fault) if fault == point => {
                Err(DatabaseError::TransactionFailed(format!("injected fault: {}", fault)))
            }
            _ => Ok(()),
        }
    }

    /// Loads the full graph, mutates it in memory and flushes once
    async fn raise_object_graph(
        &self,
        conn: &mut PgConnection,
        raise: SalaryRaise,
    ) -> Result<RaiseOutcome, DatabaseError> {
        let company = self
            .repository
            .find_company_with_employees(&mut *conn, raise.company_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(CompanyId::entity(), raise.company_id))?;

        let mut tracked = Tracked::attach(company);
        let updated_at = self.clock.now();
        let employees_updated = tracked.get_mut().apply_raise(raise.rate, updated_at)?;

        tracked
            .save_changes_with(conn, || {
                self.check_fault(FaultPoint::AfterSalaryUpdate)?;
                self.check_fault(FaultPoint::BeforeCommit)
            })
            .await?;

        Ok(RaiseOutcome {
            company_id: raise.company_id,
            strategy: raise.strategy,
            employees_updated,
            updated_at,
        })
    }

    /// Loads the company row only, multiplies every salary with one
    /// statement and flushes the timestamp inside one explicit transaction
    async fn raise_bulk(
        &self,
        conn: &mut PgConnection,
        raise: SalaryRaise,
        statement: BulkStatement,
    ) -> Result<RaiseOutcome, DatabaseError> {
        let company = self
            .repository
            .find_company(&mut *conn, raise.company_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(CompanyId::entity(), raise.company_id))?;
        let mut tracked = Tracked::attach(company.into_company());

        let mut tx = conn.begin().await?;

        let employees_updated = match statement {
            BulkStatement::Interpolated => {
                self.repository
                    .bulk_raise_interpolated(&mut tx, raise.company_id, raise.rate)
                    .await?
            }
            BulkStatement::Bound => {
                self.repository
                    .bulk_raise_bound(&mut tx, raise.company_id, raise.rate)
                    .await?
            }
        };
        debug!(employees_updated, ?statement, "Bulk salary statement executed");
        self.check_fault(FaultPoint::AfterSalaryUpdate)?;

        let updated_at = self.clock.now();
        tracked.get_mut().stamp_salary_update(updated_at);
        tracked.save_changes(&mut tx).await?;

        self.check_fault(FaultPoint::BeforeCommit)?;
        tx.commit().await?;

        Ok(RaiseOutcome {
            company_id: raise.company_id,
            strategy: raise.strategy,
            employees_updated,
            updated_at,
        })
    }
}

// Mark as a domain port
impl DomainPort for PostgresPayrollAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPayrollAdapter {
    /// Checks database connectivity with `SELECT 1`
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-payroll-adapter".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-payroll-adapter".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl PayrollPort for PostgresPayrollAdapter {
    #[instrument(skip(self), fields(company_id = %raise.company_id, strategy = %raise.strategy))]
    async fn increase_salaries(&self, raise: SalaryRaise) -> Result<RaiseOutcome, PortError> {
        let mut conn = self.pool.acquire().await.map_err(DatabaseError::from)?;
        let outcome = match BulkStatement::for_strategy(raise.strategy) {
            None => self.raise_object_graph(&mut conn, raise).await?,
            Some(statement) => self.raise_bulk(&mut conn, raise, statement).await?,
        };
        Ok(outcome)
    }

    async fn get_company(&self, id: CompanyId) -> Result<Company, PortError> {
        let mut conn = self.pool.acquire().await.map_err(DatabaseError::from)?;
        let company = self
            .repository
            .find_company_with_employees(&mut conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(CompanyId::entity(), id))?;
        Ok(company)
    }
}
