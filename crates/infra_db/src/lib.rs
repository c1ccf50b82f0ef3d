//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL side of the salary raise service using
//! SQLx.
//!
//! # Architecture
//!
//! - **pool**: connection pool configuration and the reference migration
//! - **unit_of_work**: snapshot-based change tracking; tracked entities are
//!   mutated in memory and flushed as one transaction
//! - **repositories**: SQL for companies and employees, including the two
//!   bulk salary statements
//! - **adapters**: the `PayrollPort` implementation that ties them together
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresPayrollAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/payroll")).await?;
//! let adapter = PostgresPayrollAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod unit_of_work;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, ping, DatabaseConfig};
pub use error::DatabaseError;
pub use unit_of_work::{Tracked, PendingChange};
pub use repositories::CompanyRepository;
pub use adapters::PostgresPayrollAdapter;
