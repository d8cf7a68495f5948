//! Driving port for employee mutations.
//!
//! HTTP handlers call this port once request payloads have been validated
//! into domain values.

use async_trait::async_trait;

use crate::domain::{
    EmployeeAggregate, EmployeeId, EmployeeReconciliation, Error, NewEmployeeAggregate,
};

/// Create, reconcile and delete employees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    /// Create an employee with its phone numbers and addresses.
    ///
    /// # Errors
    ///
    /// Invalid request when the department does not exist, conflict when the
    /// e-mail is taken, service unavailable or internal on storage failure.
    async fn create(&self, aggregate: NewEmployeeAggregate) -> Result<EmployeeAggregate, Error>;

    /// Reconcile an employee against the submitted target state.
    ///
    /// # Errors
    ///
    /// Not found when the employee does not exist; otherwise as for
    /// [`EmployeeCommand::create`]. No partial change survives an error.
    async fn update(&self, request: EmployeeReconciliation) -> Result<EmployeeAggregate, Error>;

    /// Delete an employee and its children.
    async fn delete(&self, id: EmployeeId) -> Result<(), Error>;
}
