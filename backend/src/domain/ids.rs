//! Integer identifiers for the personnel records.
//!
//! Every table uses a `bigserial` primary key, so identifiers are thin `i64`
//! wrappers. Distinct types stop a phone number id from being passed where an
//! address id is expected.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Raw database identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Identifier of an employee row.
    EmployeeId
}

define_id! {
    /// Identifier of a department row.
    DepartmentId
}

define_id! {
    /// Identifier of a phone number owned by an employee.
    PhoneNumberId
}

define_id! {
    /// Identifier of an address owned by an employee.
    AddressId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_raw_value() {
        let mut ids = vec![PhoneNumberId::new(3), PhoneNumberId::new(1)];
        ids.sort();
        assert_eq!(ids, vec![PhoneNumberId::new(1), PhoneNumberId::new(3)]);
    }

    #[test]
    fn display_renders_raw_value() {
        assert_eq!(EmployeeId::from(42).to_string(), "42");
    }
}
