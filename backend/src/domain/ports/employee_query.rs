//! Driving port for employee reads.

use async_trait::async_trait;

use crate::domain::{EmployeeAggregate, EmployeeId, Error};

/// Read employee aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// Fetch one employee, or a not-found error.
    async fn get(&self, id: EmployeeId) -> Result<EmployeeAggregate, Error>;

    /// Fetch every employee ordered by id.
    async fn list(&self) -> Result<Vec<EmployeeAggregate>, Error>;
}
