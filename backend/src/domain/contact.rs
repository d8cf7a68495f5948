//! Phone numbers and addresses owned by an employee.
//!
//! Children are only ever written through the employee aggregate: creation
//! alongside a new employee, or reconciliation on update.

use super::{
    AddressId, AddressLine, ContactLabel, EmployeeId, Locality, PhoneNumberId, PhoneValue,
    PostalCode,
};

/// Mapped fields of a phone number, overwritten as a whole on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumberFields {
    /// Phone number as entered.
    pub phone: PhoneValue,
    /// Optional label such as `mobile`.
    pub label: Option<ContactLabel>,
    /// Primary flag. Several numbers may be primary at once.
    pub is_primary: bool,
}

impl PhoneNumberFields {
    /// Fields with no label and the primary flag cleared.
    #[must_use]
    pub fn new(phone: PhoneValue) -> Self {
        Self {
            phone,
            label: None,
            is_primary: false,
        }
    }
}

/// Mapped fields of an address, overwritten as a whole on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    /// First street line.
    pub line1: AddressLine,
    /// Optional second street line.
    pub line2: Option<AddressLine>,
    /// City.
    pub city: Option<Locality>,
    /// State or region.
    pub state: Option<Locality>,
    /// Country.
    pub country: Option<Locality>,
    /// Postal code.
    pub postal_code: Option<PostalCode>,
    /// Optional label such as `home`.
    pub label: Option<ContactLabel>,
    /// Primary flag. Several addresses may be primary at once.
    pub is_primary: bool,
}

impl AddressFields {
    /// Fields with only the first line set.
    #[must_use]
    pub fn new(line1: AddressLine) -> Self {
        Self {
            line1,
            line2: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
            label: None,
            is_primary: false,
        }
    }
}

/// Persisted phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    /// Primary key.
    pub id: PhoneNumberId,
    /// Owning employee.
    pub employee_id: EmployeeId,
    /// Mapped fields.
    pub fields: PhoneNumberFields,
}

/// Persisted address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Primary key.
    pub id: AddressId,
    /// Owning employee.
    pub employee_id: EmployeeId,
    /// Mapped fields.
    pub fields: AddressFields,
}

/// One entry of a submitted child collection.
///
/// An `id` names the child to overwrite. Entries without one, or whose id is
/// not a child of the employee being reconciled, become new rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSubmission<Id, F> {
    /// Identifier of an existing child, if the client supplied one.
    pub id: Option<Id>,
    /// Target field values.
    pub fields: F,
}

impl<Id, F> ChildSubmission<Id, F> {
    /// Submission that always creates a new child.
    pub fn create(fields: F) -> Self {
        Self { id: None, fields }
    }

    /// Submission targeting an existing child.
    pub fn update(id: Id, fields: F) -> Self {
        Self {
            id: Some(id),
            fields,
        }
    }
}

/// Submitted phone number.
pub type PhoneNumberSubmission = ChildSubmission<PhoneNumberId, PhoneNumberFields>;

/// Submitted address.
pub type AddressSubmission = ChildSubmission<AddressId, AddressFields>;
