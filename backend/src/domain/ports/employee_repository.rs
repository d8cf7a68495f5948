//! Driven ports for employee persistence.
//!
//! Writes to the employee aggregate go through an [`EmployeeUnitOfWork`]: a
//! handle onto one open transaction. Adapters open the transaction, hand the
//! unit of work to [`crate::domain::reconcile_employee`] or
//! [`crate::domain::create_employee`], and commit only when the domain
//! function succeeds. Anything else rolls back.

use async_trait::async_trait;

use crate::domain::{
    AddressFields, AddressId, DepartmentId, Employee, EmployeeAggregate, EmployeeId,
    EmployeePatch, EmployeeReconciliation, NewEmployee, NewEmployeeAggregate, PhoneNumberFields,
    PhoneNumberId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by employee persistence adapters.
    pub enum EmployeeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "employee repository query failed: {message}",
        /// Another employee already uses the e-mail address.
        DuplicateEmail { email: String } =>
            "email address {email} is already in use",
    }
}

/// Failures of an aggregate write (create or reconcile).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmployeeWriteError {
    /// The employee being reconciled does not exist.
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    /// The referenced department does not exist.
    #[error("department {0} not found")]
    DepartmentNotFound(DepartmentId),
    /// The store rejected a read or write; the transaction was rolled back.
    #[error(transparent)]
    Storage(#[from] EmployeeRepositoryError),
}

/// Transactional operations over one employee and its children.
///
/// Child operations are always scoped to `employee_id`: updating or deleting
/// a child that belongs to someone else must be impossible through this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeUnitOfWork: Send {
    /// Load the employee and lock its row until the transaction ends.
    async fn lock_employee(
        &mut self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Whether a department with this id exists.
    async fn department_exists(&mut self, id: DepartmentId)
    -> Result<bool, EmployeeRepositoryError>;

    /// Insert the employee scalar fields, returning the new id.
    async fn insert_employee(
        &mut self,
        employee: &NewEmployee,
    ) -> Result<EmployeeId, EmployeeRepositoryError>;

    /// Apply a scalar patch and bump the modification timestamp.
    async fn update_employee(
        &mut self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> Result<(), EmployeeRepositoryError>;

    /// Identifiers of the employee's persisted phone numbers.
    async fn phone_number_ids(
        &mut self,
        employee_id: EmployeeId,
    ) -> Result<Vec<PhoneNumberId>, EmployeeRepositoryError>;

    /// Overwrite every mapped field of one of the employee's phone numbers.
    async fn update_phone_number(
        &mut self,
        employee_id: EmployeeId,
        id: PhoneNumberId,
        fields: &PhoneNumberFields,
    ) -> Result<(), EmployeeRepositoryError>;

    /// Create a phone number owned by the employee.
    async fn insert_phone_number(
        &mut self,
        employee_id: EmployeeId,
        fields: &PhoneNumberFields,
    ) -> Result<PhoneNumberId, EmployeeRepositoryError>;

    /// Delete the employee's phone numbers not listed in `keep`.
    async fn delete_phone_numbers_except(
        &mut self,
        employee_id: EmployeeId,
        keep: &[PhoneNumberId],
    ) -> Result<usize, EmployeeRepositoryError>;

    /// Identifiers of the employee's persisted addresses.
    async fn address_ids(
        &mut self,
        employee_id: EmployeeId,
    ) -> Result<Vec<AddressId>, EmployeeRepositoryError>;

    /// Overwrite every mapped field of one of the employee's addresses.
    async fn update_address(
        &mut self,
        employee_id: EmployeeId,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<(), EmployeeRepositoryError>;

    /// Create an address owned by the employee.
    async fn insert_address(
        &mut self,
        employee_id: EmployeeId,
        fields: &AddressFields,
    ) -> Result<AddressId, EmployeeRepositoryError>;

    /// Delete the employee's addresses not listed in `keep`.
    async fn delete_addresses_except(
        &mut self,
        employee_id: EmployeeId,
        keep: &[AddressId],
    ) -> Result<usize, EmployeeRepositoryError>;

    /// Load the employee with department and children, as seen by this
    /// transaction.
    async fn load_aggregate(
        &mut self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError>;
}

/// Port for employee aggregate storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Create an employee and its children atomically.
    async fn create(
        &self,
        aggregate: &NewEmployeeAggregate,
    ) -> Result<EmployeeAggregate, EmployeeWriteError>;

    /// Bring an employee and its children to the requested state atomically.
    async fn reconcile(
        &self,
        request: &EmployeeReconciliation,
    ) -> Result<EmployeeAggregate, EmployeeWriteError>;

    /// Fetch one aggregate.
    async fn find(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError>;

    /// Fetch every aggregate ordered by employee id.
    async fn list(&self) -> Result<Vec<EmployeeAggregate>, EmployeeRepositoryError>;

    /// Delete an employee and, by cascade, its children.
    ///
    /// Returns `false` when no such employee exists.
    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError>;
}
