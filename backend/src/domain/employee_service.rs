//! Employee domain service.
//!
//! Implements the employee driving ports on top of an
//! [`EmployeeRepository`], translating repository failures into domain
//! [`Error`] values.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    EmployeeCommand, EmployeeQuery, EmployeeRepository, EmployeeRepositoryError,
    EmployeeWriteError,
};
use crate::domain::{
    EmployeeAggregate, EmployeeId, EmployeeReconciliation, Error, NewEmployeeAggregate,
};

/// Employee service implementing [`EmployeeCommand`] and [`EmployeeQuery`].
#[derive(Clone)]
pub struct EmployeeService<R> {
    repo: Arc<R>,
}

impl<R> EmployeeService<R> {
    /// Create a new service backed by `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_repository_error(error: EmployeeRepositoryError) -> Error {
    match error {
        EmployeeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("employee repository unavailable: {message}"))
        }
        EmployeeRepositoryError::Query { message } => {
            Error::internal(format!("employee repository error: {message}"))
        }
        EmployeeRepositoryError::DuplicateEmail { email } => {
            Error::conflict("email address is already in use").with_details(json!({
                "field": "email",
                "code": "duplicate_email",
                "value": email,
            }))
        }
    }
}

fn map_write_error(error: EmployeeWriteError) -> Error {
    match error {
        EmployeeWriteError::EmployeeNotFound(id) => {
            Error::not_found(format!("employee {id} not found"))
        }
        EmployeeWriteError::DepartmentNotFound(id) => {
            Error::invalid_request("department does not exist").with_details(json!({
                "field": "department_id",
                "code": "unknown_department",
                "value": id.get(),
            }))
        }
        EmployeeWriteError::Storage(error) => map_repository_error(error),
    }
}

#[async_trait]
impl<R> EmployeeCommand for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn create(&self, aggregate: NewEmployeeAggregate) -> Result<EmployeeAggregate, Error> {
        self.repo.create(&aggregate).await.map_err(map_write_error)
    }

    async fn update(&self, request: EmployeeReconciliation) -> Result<EmployeeAggregate, Error> {
        self.repo.reconcile(&request).await.map_err(map_write_error)
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_repository_error)? {
            Ok(())
        } else {
            Err(Error::not_found(format!("employee {id} not found")))
        }
    }
}

#[async_trait]
impl<R> EmployeeQuery for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn get(&self, id: EmployeeId) -> Result<EmployeeAggregate, Error> {
        self.repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("employee {id} not found")))
    }

    async fn list(&self) -> Result<Vec<EmployeeAggregate>, Error> {
        self.repo.list().await.map_err(map_repository_error)
    }
}
