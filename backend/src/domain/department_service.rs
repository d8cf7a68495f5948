//! Department domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    DepartmentCommand, DepartmentQuery, DepartmentRepository, DepartmentRepositoryError,
};
use crate::domain::{Department, DepartmentId, DepartmentName, Error};

/// Department service implementing [`DepartmentCommand`] and
/// [`DepartmentQuery`].
#[derive(Clone)]
pub struct DepartmentService<R> {
    repo: Arc<R>,
}

impl<R> DepartmentService<R> {
    /// Create a new service backed by `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_repository_error(error: DepartmentRepositoryError) -> Error {
    match error {
        DepartmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("department repository unavailable: {message}"))
        }
        DepartmentRepositoryError::Query { message } => {
            Error::internal(format!("department repository error: {message}"))
        }
        DepartmentRepositoryError::InUse { id } => {
            Error::conflict("department still has employees").with_details(json!({
                "code": "department_in_use",
                "value": id,
            }))
        }
    }
}

fn not_found(id: DepartmentId) -> Error {
    Error::not_found(format!("department {id} not found"))
}

#[async_trait]
impl<R> DepartmentCommand for DepartmentService<R>
where
    R: DepartmentRepository,
{
    async fn create(&self, name: DepartmentName) -> Result<Department, Error> {
        self.repo.create(&name).await.map_err(map_repository_error)
    }

    async fn rename(&self, id: DepartmentId, name: DepartmentName) -> Result<Department, Error> {
        self.repo
            .rename(id, &name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: DepartmentId) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_repository_error)? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

#[async_trait]
impl<R> DepartmentQuery for DepartmentService<R>
where
    R: DepartmentRepository,
{
    async fn get(&self, id: DepartmentId) -> Result<Department, Error> {
        self.repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self) -> Result<Vec<Department>, Error> {
        self.repo.list().await.map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockDepartmentRepository;

    fn make_service(repo: MockDepartmentRepository) -> DepartmentService<MockDepartmentRepository> {
        DepartmentService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn delete_in_use_department_is_a_conflict() {
        let mut repo = MockDepartmentRepository::new();
        repo.expect_delete()
            .times(1)
            .return_once(|id| Err(DepartmentRepositoryError::in_use(id.get())));

        let error = make_service(repo)
            .delete(DepartmentId::new(3))
            .await
            .expect_err("conflict");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.details().map(|d| d["value"].clone()), Some(json!(3)));
    }

    #[tokio::test]
    async fn rename_missing_department_is_not_found() {
        let mut repo = MockDepartmentRepository::new();
        repo.expect_rename().times(1).return_once(|_, _| Ok(None));

        let name = DepartmentName::new("Ops").expect("valid name");
        let error = make_service(repo)
            .rename(DepartmentId::new(8), name)
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "department 8 not found");
    }

    #[tokio::test]
    async fn get_maps_query_failures_to_internal() {
        let mut repo = MockDepartmentRepository::new();
        repo.expect_find()
            .return_once(|_| Err(DepartmentRepositoryError::query("syntax error")));

        let error = make_service(repo)
            .get(DepartmentId::new(1))
            .await
            .expect_err("internal");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn delete_missing_department_is_not_found() {
        let mut repo = MockDepartmentRepository::new();
        repo.expect_delete().return_once(|_| Ok(false));

        let error = make_service(repo)
            .delete(DepartmentId::new(3))
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
