//! Department HTTP handlers.
//!
//! ```text
//! POST   /api/v1/departments {"name":"Engineering"}
//! GET    /api/v1/departments
//! GET    /api/v1/departments/{id}
//! PUT    /api/v1/departments/{id} {"name":"Research"}
//! DELETE /api/v1/departments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, route, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Department, DepartmentId, DepartmentName, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::{DeletedResponse, UpdatedResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_text};

/// Request body for creating or renaming a department.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct DepartmentRequest {
    #[schema(example = "Engineering")]
    pub name: Option<String>,
}

impl DepartmentRequest {
    fn into_name(self) -> Result<DepartmentName, Error> {
        parse_text(&FieldName::new("name"), self.name, DepartmentName::new)
    }
}

/// Department as rendered in responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Department> for DepartmentResponse {
    fn from(value: Department) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

fn department_id(path: web::Path<i64>) -> Result<DepartmentId, Error> {
    parse_id(&FieldName::new("id"), path.into_inner()).map(DepartmentId::new)
}

/// Create a department.
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "createDepartment"
)]
#[post("/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    payload: web::Json<DepartmentRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let department = state.departments.create(name).await?;
    Ok(HttpResponse::Created().json(DepartmentResponse::from(department)))
}

/// List departments.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments ordered by id", body = [DepartmentResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DepartmentResponse>>> {
    let departments = state.departments_query.list().await?;
    Ok(web::Json(
        departments
            .into_iter()
            .map(DepartmentResponse::from)
            .collect(),
    ))
}

/// Fetch one department.
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id" = i64, Path, description = "Department identifier")),
    responses(
        (status = 200, description = "Department", body = DepartmentResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Department not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "getDepartment"
)]
#[get("/departments/{id}")]
pub async fn get_department(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let id = department_id(path)?;
    let department = state.departments_query.get(id).await?;
    Ok(web::Json(department.into()))
}

/// Rename a department.
#[utoipa::path(
    method(put, patch),
    path = "/api/v1/departments/{id}",
    params(("id" = i64, Path, description = "Department identifier")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department renamed", body = UpdatedResponse<DepartmentResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Department not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "updateDepartment"
)]
#[route("/departments/{id}", method = "PUT", method = "PATCH")]
pub async fn update_department(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<DepartmentRequest>,
) -> ApiResult<web::Json<UpdatedResponse<DepartmentResponse>>> {
    let id = department_id(path)?;
    let name = payload.into_inner().into_name()?;
    let department = state.departments.rename(id, name).await?;
    Ok(web::Json(UpdatedResponse::new(
        "Department updated successfully",
        department.into(),
    )))
}

/// Delete a department that no employee belongs to.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    params(("id" = i64, Path, description = "Department identifier")),
    responses(
        (status = 200, description = "Department deleted", body = DeletedResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Department not found", body = ErrorSchema),
        (status = 409, description = "Department still has employees", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "deleteDepartment"
)]
#[delete("/departments/{id}")]
pub async fn delete_department(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let id = department_id(path)?;
    state.departments.delete(id).await?;
    Ok(web::Json(DeletedResponse::new("Department deleted successfully")))
}
