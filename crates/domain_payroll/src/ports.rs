//! Payroll Domain Ports
//!
//! This module defines the port interface the salary raise operation needs
//! from its store, so the HTTP layer and the service never depend on a
//! concrete database.
//!
//! # Architecture
//!
//! - **PostgreSQL adapter** (infra_db): executes one of the three update
//!   strategies against the real tables
//! - **In-memory adapter** (`mock`): copy-on-write store for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_payroll::{PayrollPort, SalaryRaise, UpdateStrategy};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn PayrollPort> = Arc::new(PostgresPayrollAdapter::new(pool));
//! let outcome = port
//!     .increase_salaries(SalaryRaise::new(company_id, rate, UpdateStrategy::BoundSql))
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CompanyId, DomainPort, HealthCheckable, PortError};

use crate::company::Company;
use crate::raise::{RaiseOutcome, SalaryRaise};

/// Port for reading companies and applying salary raises
///
/// Implementations must apply a raise atomically: either every employee row
/// and the company timestamp change, or nothing does.
#[async_trait]
pub trait PayrollPort: DomainPort + HealthCheckable {
    /// Raises all salaries of one company using the requested strategy
    ///
    /// # Errors
    ///
    /// * `PortError::NotFound` if the company does not exist; nothing is written
    /// * any other variant if the store failed; nothing is written
    async fn increase_salaries(&self, raise: SalaryRaise) -> Result<RaiseOutcome, PortError>;

    /// Loads a company together with its employees
    async fn get_company(&self, id: CompanyId) -> Result<Company, PortError>;
}

/// Point in a raise at which an injected fault fires
///
/// Used to show that a failure between the bulk statement and commit leaves
/// the store unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPoint {
    /// After employee salaries were updated, before the timestamp flush
    AfterSalaryUpdate,
    /// After every statement ran, immediately before commit
    BeforeCommit,
}

impl FaultPoint {
    /// The error an adapter returns when this fault fires
    pub fn error(&self) -> PortError {
        PortError::internal(format!("injected fault: {}", self))
    }
}

impl fmt::Display for FaultPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultPoint::AfterSalaryUpdate => f.write_str("after_salary_update"),
            FaultPoint::BeforeCommit => f.write_str("before_commit"),
        }
    }
}

/// In-memory adapter for testing
///
/// Raises are applied to a copy of the company that replaces the stored one
/// only when every step succeeded, which mirrors transaction rollback.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, Clock, HealthCheckResult, SystemClock};

    /// In-memory implementation of PayrollPort
    #[derive(Debug, Clone)]
    pub struct InMemoryPayrollPort {
        companies: Arc<RwLock<BTreeMap<CompanyId, Company>>>,
        clock: Arc<dyn Clock>,
        fault: Option<FaultPoint>,
    }

    impl Default for InMemoryPayrollPort {
        fn default() -> Self {
            Self::new()
        }
    }

    impl InMemoryPayrollPort {
        /// Creates an empty store using the system clock
        pub fn new() -> Self {
            Self {
                companies: Arc::new(RwLock::new(BTreeMap::new())),
                clock: Arc::new(SystemClock),
                fault: None,
            }
        }

        /// Pre-populates the store with companies
        pub async fn with_companies(companies: Vec<Company>) -> Self {
            let port = Self::new();
            for company in companies {
                port.insert_company(company).await;
            }
            port
        }

        /// Replaces the clock used to stamp raises
        pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
            self.clock = clock;
            self
        }

        /// Returns a handle on the same store that fails at `point`
        pub fn with_fault(&self, point: FaultPoint) -> Self {
            Self {
                fault: Some(point),
                ..self.clone()
            }
        }

        pub async fn insert_company(&self, company: Company) {
            self.companies.write().await.insert(company.id, company);
        }

        pub async fn company_count(&self) -> usize {
            self.companies.read().await.len()
        }

        fn check_fault(&self, point: FaultPoint) -> Result<(), PortError> {
            match self.fault {
                Some(fault) if fault == point => Err(fault.error()),
                _ => Ok(()),
            }
        }
    }

    impl DomainPort for InMemoryPayrollPort {}

    #[async_trait]
    impl HealthCheckable for InMemoryPayrollPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-payroll-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl PayrollPort for InMemoryPayrollPort {
        async fn increase_salaries(&self, raise: SalaryRaise) -> Result<RaiseOutcome, PortError> {
            let mut companies = self.companies.write().await;
            let mut working = companies
                .get(&raise.company_id)
                .cloned()
                .ok_or_else(|| PortError::not_found(CompanyId::entity(), raise.company_id))?;

            let updated_at = self.clock.now();
            let employees_updated = working
                .apply_raise(raise.rate, updated_at)
                .map_err(|e| PortError::internal(e.to_string()))?;
            self.check_fault(FaultPoint::AfterSalaryUpdate)?;
            self.check_fault(FaultPoint::BeforeCommit)?;

            companies.insert(working.id, working);

            Ok(RaiseOutcome {
                company_id: raise.company_id,
                strategy: raise.strategy,
                employees_updated,
                updated_at,
            })
        }

        async fn get_company(&self, id: CompanyId) -> Result<Company, PortError> {
            self.companies
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found(CompanyId::entity(), id))
        }
    }
}
