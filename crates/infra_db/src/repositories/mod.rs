//! Repository implementations for domain entities
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. Every method takes the caller's `&mut PgConnection`, which may be
//! inside a transaction.

pub mod company;

pub use company::{CompanyRepository, CompanyRow, CompanyEmployeeRow, BULK_RAISE_SQL};
