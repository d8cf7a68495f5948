//! Driving port for department reads.

use async_trait::async_trait;

use crate::domain::{Department, DepartmentId, Error};

/// Read departments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentQuery: Send + Sync {
    /// Fetch one department, or a not-found error.
    async fn get(&self, id: DepartmentId) -> Result<Department, Error>;

    /// Fetch every department ordered by id.
    async fn list(&self) -> Result<Vec<Department>, Error>;
}
