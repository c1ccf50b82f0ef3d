//! Core Kernel - Foundational types for the salary raise service
//!
//! This crate provides the building blocks shared by every other crate:
//! - Salary and raise-rate types with precise decimal arithmetic
//! - Integer-keyed identifiers for companies and employees
//! - Clocks that match the store's timestamp precision
//! - Port infrastructure for the hexagonal architecture

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Salary, RaiseRate, MoneyError, SALARY_DECIMAL_PLACES};
pub use temporal::{Clock, SystemClock, FixedClock, truncate_to_micros};
pub use identifiers::{CompanyId, EmployeeId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
