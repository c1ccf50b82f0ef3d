//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresPayrollAdapter;
//! use domain_payroll::PayrollPort;
//!
//! let adapter = PostgresPayrollAdapter::new(pool);
//! let company = adapter.get_company(company_id).await?;
//! ```

pub mod payroll;

pub use payroll::PostgresPayrollAdapter;
