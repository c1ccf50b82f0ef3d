//! Strongly-typed identifiers for payroll entities
//!
//! The backing store keys companies and employees by integer primary keys.
//! Newtype wrappers keep a company id from being passed where an employee id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw primary key value
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw primary key value
            pub const fn value(&self) -> i32 {
                self.0
            }

            /// Returns the entity name used in error messages
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> i32 {
                id.0
            }
        }
    };
}

define_id!(CompanyId, "Company");
define_id!(EmployeeId, "Employee");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_id_display_is_bare_number() {
        assert_eq!(CompanyId::new(42).to_string(), "42");
    }

    #[test]
    fn test_id_parsing() {
        let parsed: EmployeeId = " 17 ".parse().unwrap();
        assert_eq!(parsed, EmployeeId::new(17));
        assert!("abc".parse::<CompanyId>().is_err());
    }

    #[test]
    fn test_i32_conversion() {
        let id = CompanyId::from(7);
        let back: i32 = id.into();
        assert_eq!(back, 7);
        assert_eq!(CompanyId::entity(), "Company");
    }
}
