//! Employee records and the employee aggregate.
//!
//! An employee together with its phone numbers and addresses forms one
//! consistency boundary: children are created, overwritten and removed only
//! through the aggregate.

use chrono::{DateTime, NaiveDate, Utc};

use super::{
    Address, AddressFields, AddressSubmission, DepartmentId, DepartmentSummary, Designation,
    EmailAddress, EmployeeId, PersonName, PhoneNumber, PhoneNumberFields, PhoneNumberSubmission,
};

/// Persisted employee scalar fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Primary key.
    pub id: EmployeeId,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: Option<PersonName>,
    /// Unique contact address.
    pub email: Option<EmailAddress>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Job title.
    pub designation: Option<Designation>,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Scalar fields of an employee about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: Option<PersonName>,
    /// Unique contact address.
    pub email: Option<EmailAddress>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Job title.
    pub designation: Option<Designation>,
    /// Owning department.
    pub department_id: DepartmentId,
}

/// Partial update of employee scalar fields.
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    /// New given name.
    pub first_name: Option<PersonName>,
    /// New family name, or `Some(None)` to clear it.
    pub last_name: Option<Option<PersonName>>,
    /// New e-mail, or `Some(None)` to clear it.
    pub email: Option<Option<EmailAddress>>,
    /// New date of birth, or `Some(None)` to clear it.
    pub date_of_birth: Option<Option<NaiveDate>>,
    /// New job title, or `Some(None)` to clear it.
    pub designation: Option<Option<Designation>>,
    /// New owning department.
    pub department_id: Option<DepartmentId>,
}

impl EmployeePatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch to an in-memory employee.
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(first_name) = &self.first_name {
            employee.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            employee.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            employee.email = email.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            employee.date_of_birth = date_of_birth;
        }
        if let Some(designation) = &self.designation {
            employee.designation = designation.clone();
        }
        if let Some(department_id) = self.department_id {
            employee.department_id = department_id;
        }
    }
}

/// Employee with department and both child collections loaded.
///
/// Children are ordered by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAggregate {
    /// Scalar fields.
    pub employee: Employee,
    /// Owning department.
    pub department: DepartmentSummary,
    /// Phone numbers.
    pub phone_numbers: Vec<PhoneNumber>,
    /// Addresses.
    pub addresses: Vec<Address>,
}

/// Everything needed to create an employee and its children in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployeeAggregate {
    /// Scalar fields.
    pub employee: NewEmployee,
    /// Phone numbers to create.
    pub phone_numbers: Vec<PhoneNumberFields>,
    /// Addresses to create.
    pub addresses: Vec<AddressFields>,
}

/// Target state for an existing employee.
///
/// A collection left as `None` is not touched. `Some(vec![])` removes every
/// child of that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReconciliation {
    /// Employee being reconciled.
    pub employee_id: EmployeeId,
    /// Scalar field changes.
    pub patch: EmployeePatch,
    /// Target phone numbers, if the collection was submitted.
    pub phone_numbers: Option<Vec<PhoneNumberSubmission>>,
    /// Target addresses, if the collection was submitted.
    pub addresses: Option<Vec<AddressSubmission>>,
}

impl EmployeeReconciliation {
    /// Reconciliation that changes nothing yet.
    #[must_use]
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            patch: EmployeePatch::default(),
            phone_numbers: None,
            addresses: None,
        }
    }
}
