//! Driven port for department persistence.

use async_trait::async_trait;

use crate::domain::{Department, DepartmentId, DepartmentName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by department persistence adapters.
    pub enum DepartmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "department repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "department repository query failed: {message}",
        /// Employees still reference the department.
        InUse { id: i64 } =>
            "department {id} still has employees",
    }
}

/// Port for department storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Insert a department.
    async fn create(&self, name: &DepartmentName) -> Result<Department, DepartmentRepositoryError>;

    /// Fetch one department.
    async fn find(&self, id: DepartmentId)
    -> Result<Option<Department>, DepartmentRepositoryError>;

    /// Fetch every department ordered by id.
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError>;

    /// Rename a department. Returns `None` when it does not exist.
    async fn rename(
        &self,
        id: DepartmentId,
        name: &DepartmentName,
    ) -> Result<Option<Department>, DepartmentRepositoryError>;

    /// Delete a department with no employees.
    ///
    /// Returns `false` when no such department exists and
    /// [`DepartmentRepositoryError::InUse`] while employees reference it.
    async fn delete(&self, id: DepartmentId) -> Result<bool, DepartmentRepositoryError>;
}
