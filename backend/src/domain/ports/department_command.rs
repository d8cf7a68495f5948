//! Driving port for department mutations.

use async_trait::async_trait;

use crate::domain::{Department, DepartmentId, DepartmentName, Error};

/// Create, rename and delete departments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentCommand: Send + Sync {
    /// Create a department.
    async fn create(&self, name: DepartmentName) -> Result<Department, Error>;

    /// Rename a department, or fail with not found.
    async fn rename(&self, id: DepartmentId, name: DepartmentName) -> Result<Department, Error>;

    /// Delete a department. Refused with a conflict while employees belong
    /// to it.
    async fn delete(&self, id: DepartmentId) -> Result<(), Error>;
}
