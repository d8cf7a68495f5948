//! PostgreSQL-backed department repository.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DepartmentRepository, DepartmentRepositoryError};
use crate::domain::{Department, DepartmentId, DepartmentName};

use super::diesel_helpers::{
    map_corrupt_department, map_department_diesel_error, map_department_pool_error,
};
use super::models::{DepartmentRow, DepartmentUpdate, NewDepartmentRow};
use super::pool::DbPool;
use super::schema::departments;

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> DepartmentRepositoryError {
    move |error| map_department_diesel_error(error, operation, None)
}

/// Diesel-backed implementation of [`DepartmentRepository`].
#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn create(&self, name: &DepartmentName) -> Result<Department, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_department_pool_error)?;
        let row: DepartmentRow = diesel::insert_into(departments::table)
            .values(NewDepartmentRow {
                name: name.as_str(),
            })
            .returning(DepartmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("insert department"))?;
        row.into_domain().map_err(map_corrupt_department)
    }

    async fn find(
        &self,
        id: DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_department_pool_error)?;
        let row: Option<DepartmentRow> = departments::table
            .find(id.get())
            .select(DepartmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find department"))?;
        row.map(DepartmentRow::into_domain)
            .transpose()
            .map_err(map_corrupt_department)
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_department_pool_error)?;
        let rows: Vec<DepartmentRow> = departments::table
            .order_by(departments::id)
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list departments"))?;
        rows.into_iter()
            .map(DepartmentRow::into_domain)
            .collect::<Result<_, _>>()
            .map_err(map_corrupt_department)
    }

    async fn rename(
        &self,
        id: DepartmentId,
        name: &DepartmentName,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_department_pool_error)?;
        let row: Option<DepartmentRow> = diesel::update(departments::table.find(id.get()))
            .set(DepartmentUpdate {
                name: name.as_str(),
                updated_at: Utc::now(),
            })
            .returning(DepartmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("rename department"))?;
        row.map(DepartmentRow::into_domain)
            .transpose()
            .map_err(map_corrupt_department)
    }

    async fn delete(&self, id: DepartmentId) -> Result<bool, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_department_pool_error)?;
        let deleted = diesel::delete(departments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|error| {
                map_department_diesel_error(error, "delete department", Some(id.get()))
            })?;
        Ok(deleted > 0)
    }
}
