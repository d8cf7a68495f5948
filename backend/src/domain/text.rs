//! Validated text values used by employee, department and contact records.
//!
//! Values are trimmed on construction. Length limits count Unicode scalar
//! values and mirror the column widths of the backing tables.

use std::fmt;

/// Validation errors raised by the text value constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The value was empty once trimmed.
    #[error("must not be empty")]
    Empty,
    /// The value exceeded the column width.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
    /// The value does not have the expected shape.
    #[error("is not well formed")]
    Malformed,
}

fn bounded(value: &str, max: usize) -> Result<String, TextError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(TextError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters.
            pub const MAX_CHARS: usize = $max;

            /// Validate and construct the value.
            pub fn new(value: impl AsRef<str>) -> Result<Self, TextError> {
                bounded(value.as_ref(), Self::MAX_CHARS).map(Self)
            }

            /// Borrow the validated text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_text! {
    /// First or last name of an employee.
    PersonName, 100
}

bounded_text! {
    /// Job title of an employee.
    Designation, 100
}

bounded_text! {
    /// Department name.
    DepartmentName, 100
}

bounded_text! {
    /// Phone number as entered; formatting is not normalised.
    PhoneValue, 20
}

bounded_text! {
    /// Free-form label such as `mobile` or `home`.
    ContactLabel, 50
}

bounded_text! {
    /// Street line of an address.
    AddressLine, 255
}

bounded_text! {
    /// City, state or country.
    Locality, 100
}

bounded_text! {
    /// Postal or ZIP code.
    PostalCode, 20
}

/// Employee e-mail address, unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Maximum length in characters.
    pub const MAX_CHARS: usize = 255;

    /// Validate and construct an address.
    ///
    /// Accepts `local@domain` where neither part is empty, no domain label is
    /// empty and no whitespace appears. Single-label hosts are allowed.
    ///
    /// # Examples
    /// ```
    /// use personnel::domain::{EmailAddress, TextError};
    ///
    /// assert!(EmailAddress::new("ada@example.com").is_ok());
    /// assert!(EmailAddress::new("ada@localhost").is_ok());
    /// assert_eq!(EmailAddress::new("ada@.com"), Err(TextError::Malformed));
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, TextError> {
        let candidate = bounded(value.as_ref(), Self::MAX_CHARS)?;
        if !is_well_formed_email(&candidate) {
            return Err(TextError::Malformed);
        }
        Ok(Self(candidate))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn is_well_formed_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
