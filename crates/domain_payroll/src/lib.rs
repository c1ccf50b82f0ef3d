//! Payroll Domain
//!
//! This crate models companies, their employees, and the one business
//! operation the service offers: raise every salary of a company by a
//! proportional rate and stamp the company with the time of the raise.
//!
//! # Update strategies
//!
//! The raise can be executed three ways (see [`UpdateStrategy`]). They are
//! interchangeable for callers and differ only in execution cost:
//!
//! - **Object graph**: load the company with all employees, mutate them in
//!   memory, flush the tracked changes in one transaction
//! - **Interpolated SQL**: one `UPDATE` built with the query builder
//! - **Bound SQL**: one fixed `UPDATE` with bound parameters
//!
//! A bulk `UPDATE` runs immediately, not when tracked changes are flushed,
//! so both bulk strategies open an explicit transaction that also covers
//! the timestamp flush.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_payroll::{SalaryService, UpdateStrategy};
//!
//! let service = SalaryService::new(port);
//! service.increase_salaries(CompanyId::new(1), UpdateStrategy::BoundSql).await?;
//! ```

pub mod company;
pub mod strategy;
pub mod raise;
pub mod error;
pub mod ports;
pub mod services;

pub use company::{Company, Employee};
pub use strategy::UpdateStrategy;
pub use raise::{SalaryRaise, RaiseOutcome};
pub use error::PayrollError;
pub use ports::{PayrollPort, FaultPoint};
pub use services::SalaryService;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryPayrollPort;
