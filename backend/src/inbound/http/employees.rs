//! Employee HTTP handlers.
//!
//! ```text
//! POST   /api/v1/employees
//! GET    /api/v1/employees
//! GET    /api/v1/employees/{id}
//! PUT    /api/v1/employees/{id}
//! PATCH  /api/v1/employees/{id}
//! DELETE /api/v1/employees/{id}
//! ```
//!
//! Update bodies describe the target state of the employee. A collection
//! that is absent (or `null`) is left alone; an empty array removes every
//! child of that kind. Entries carrying the `id` of one of the employee's
//! children overwrite it; the rest are created.

use actix_web::{HttpResponse, delete, get, post, route, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    Address, AddressFields, AddressId, AddressLine, AddressSubmission, ChildSubmission,
    ContactLabel, DepartmentId, Designation, EmailAddress, EmployeeAggregate, EmployeeId,
    EmployeePatch, EmployeeReconciliation, Error, Locality, NewEmployee, NewEmployeeAggregate,
    PersonName, PhoneNumber, PhoneNumberFields, PhoneNumberId, PhoneNumberSubmission, PhoneValue,
    PostalCode, TextError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::DeletedResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_id, parse_optional_date, parse_optional_text,
    parse_text,
};

/// Deserialize a nullable field so that `null` and absence stay distinct.
///
/// Combined with `#[serde(default)]`, an absent field yields `None` while an
/// explicit `null` yields `Some(None)`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Phone number entry of a create or update body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PhoneNumberRequest {
    /// Existing phone number to overwrite. Ignored on create.
    pub id: Option<i64>,
    #[schema(example = "+44 20 7946 0000")]
    pub phone: Option<String>,
    #[schema(example = "mobile")]
    pub label: Option<String>,
    pub is_primary: Option<bool>,
}

/// Address entry of a create or update body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct AddressRequest {
    /// Existing address to overwrite. Ignored on create.
    pub id: Option<i64>,
    #[schema(example = "12 St James's Square")]
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    #[schema(example = "home")]
    pub label: Option<String>,
    pub is_primary: Option<bool>,
}

/// Request body for `POST /api/v1/employees`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateEmployeeRequest {
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// `YYYY-MM-DD`.
    #[schema(example = "1815-12-10")]
    pub date_of_birth: Option<String>,
    pub designation: Option<String>,
    pub department_id: Option<i64>,
    pub phone_numbers: Option<Vec<PhoneNumberRequest>>,
    pub addresses: Option<Vec<AddressRequest>>,
}

/// Request body for `PUT`/`PATCH /api/v1/employees/{id}`.
///
/// Nullable scalar fields are cleared by an explicit `null`. Required
/// fields may be omitted but never set to `null`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateEmployeeRequest {
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    /// `YYYY-MM-DD`.
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub date_of_birth: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub designation: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub department_id: Option<Option<i64>>,
    /// Target phone numbers; absent or `null` leaves them untouched.
    pub phone_numbers: Option<Vec<PhoneNumberRequest>>,
    /// Target addresses; absent or `null` leaves them untouched.
    pub addresses: Option<Vec<AddressRequest>>,
}

fn parse_child_id(field: &FieldName, id: Option<i64>) -> Result<Option<i64>, Error> {
    id.map(|raw| parse_id(&field.child("id"), raw)).transpose()
}

impl PhoneNumberRequest {
    fn into_fields(self, field: &FieldName) -> Result<PhoneNumberFields, Error> {
        Ok(PhoneNumberFields {
            phone: parse_text(&field.child("phone"), self.phone, PhoneValue::new)?,
            label: parse_optional_text(&field.child("label"), self.label, ContactLabel::new)?,
            is_primary: self.is_primary.unwrap_or(false),
        })
    }

    fn into_submission(self, field: &FieldName) -> Result<PhoneNumberSubmission, Error> {
        let id = parse_child_id(field, self.id)?.map(PhoneNumberId::new);
        let fields = self.into_fields(field)?;
        Ok(ChildSubmission { id, fields })
    }
}

impl AddressRequest {
    fn into_fields(self, field: &FieldName) -> Result<AddressFields, Error> {
        Ok(AddressFields {
            line1: parse_text(&field.child("line1"), self.line1, AddressLine::new)?,
            line2: parse_optional_text(&field.child("line2"), self.line2, AddressLine::new)?,
            city: parse_optional_text(&field.child("city"), self.city, Locality::new)?,
            state: parse_optional_text(&field.child("state"), self.state, Locality::new)?,
            country: parse_optional_text(&field.child("country"), self.country, Locality::new)?,
            postal_code: parse_optional_text(
                &field.child("postal_code"),
                self.postal_code,
                PostalCode::new,
            )?,
            label: parse_optional_text(&field.child("label"), self.label, ContactLabel::new)?,
            is_primary: self.is_primary.unwrap_or(false),
        })
    }

    fn into_submission(self, field: &FieldName) -> Result<AddressSubmission, Error> {
        let id = parse_child_id(field, self.id)?.map(AddressId::new);
        let fields = self.into_fields(field)?;
        Ok(ChildSubmission { id, fields })
    }
}

/// Parse each element of a collection under `name.<index>`.
fn parse_collection<R, T>(
    name: &'static str,
    items: Vec<R>,
    parse: impl Fn(R, &FieldName) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let field = FieldName::new(name);
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse(item, &field.index(index)))
        .collect()
}

/// Parse a nullable text field of an update body.
fn parse_nullable_text<T>(
    field: &FieldName,
    value: Option<Option<String>>,
    parse: impl FnOnce(String) -> Result<T, TextError>,
) -> Result<Option<Option<T>>, Error> {
    value
        .map(|inner| parse_optional_text(field, inner, parse))
        .transpose()
}

const FIRST_NAME: FieldName = FieldName::new("first_name");
const LAST_NAME: FieldName = FieldName::new("last_name");
const EMAIL: FieldName = FieldName::new("email");
const DATE_OF_BIRTH: FieldName = FieldName::new("date_of_birth");
const DESIGNATION: FieldName = FieldName::new("designation");
const DEPARTMENT_ID: FieldName = FieldName::new("department_id");

impl TryFrom<CreateEmployeeRequest> for NewEmployeeAggregate {
    type Error = Error;

    fn try_from(value: CreateEmployeeRequest) -> Result<Self, Self::Error> {
        let department_id = value
            .department_id
            .ok_or_else(|| missing_field_error(&DEPARTMENT_ID))
            .and_then(|raw| parse_id(&DEPARTMENT_ID, raw))?;
        let employee = NewEmployee {
            first_name: parse_text(&FIRST_NAME, value.first_name, PersonName::new)?,
            last_name: parse_optional_text(&LAST_NAME, value.last_name, PersonName::new)?,
            email: parse_optional_text(&EMAIL, value.email, EmailAddress::new)?,
            date_of_birth: parse_optional_date(&DATE_OF_BIRTH, value.date_of_birth)?,
            designation: parse_optional_text(&DESIGNATION, value.designation, Designation::new)?,
            department_id: DepartmentId::new(department_id),
        };
        let phone_numbers = parse_collection(
            "phone_numbers",
            value.phone_numbers.unwrap_or_default(),
            PhoneNumberRequest::into_fields,
        )?;
        let addresses = parse_collection(
            "addresses",
            value.addresses.unwrap_or_default(),
            AddressRequest::into_fields,
        )?;
        Ok(Self {
            employee,
            phone_numbers,
            addresses,
        })
    }
}

impl UpdateEmployeeRequest {
    fn into_reconciliation(self, employee_id: EmployeeId) -> Result<EmployeeReconciliation, Error> {
        let first_name = self
            .first_name
            .map(|raw| parse_text(&FIRST_NAME, raw, PersonName::new))
            .transpose()?;
        let date_of_birth = self
            .date_of_birth
            .map(|inner| parse_optional_date(&DATE_OF_BIRTH, inner))
            .transpose()?;
        let department_id = self
            .department_id
            .map(|raw| {
                raw.ok_or_else(|| missing_field_error(&DEPARTMENT_ID))
                    .and_then(|raw| parse_id(&DEPARTMENT_ID, raw))
                    .map(DepartmentId::new)
            })
            .transpose()?;
        let patch = EmployeePatch {
            first_name,
            last_name: parse_nullable_text(&LAST_NAME, self.last_name, PersonName::new)?,
            email: parse_nullable_text(&EMAIL, self.email, EmailAddress::new)?,
            date_of_birth,
            designation: parse_nullable_text(&DESIGNATION, self.designation, Designation::new)?,
            department_id,
        };
        let phone_numbers = self
            .phone_numbers
            .map(|items| {
                parse_collection("phone_numbers", items, PhoneNumberRequest::into_submission)
            })
            .transpose()?;
        let addresses = self
            .addresses
            .map(|items| parse_collection("addresses", items, AddressRequest::into_submission))
            .transpose()?;
        Ok(EmployeeReconciliation {
            employee_id,
            patch,
            phone_numbers,
            addresses,
        })
    }
}

/// Department embedded in an employee response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeDepartmentResponse {
    pub id: i64,
    #[schema(example = "Engineering")]
    pub name: String,
}

/// Phone number as rendered in responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhoneNumberResponse {
    pub id: i64,
    pub phone: String,
    pub label: Option<String>,
    pub is_primary: bool,
}

impl From<PhoneNumber> for PhoneNumberResponse {
    fn from(value: PhoneNumber) -> Self {
        Self {
            id: value.id.get(),
            phone: value.fields.phone.into(),
            label: value.fields.label.map(String::from),
            is_primary: value.fields.is_primary,
        }
    }
}

/// Address as rendered in responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressResponse {
    pub id: i64,
    pub line1: String,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub label: Option<String>,
    pub is_primary: bool,
}

impl From<Address> for AddressResponse {
    fn from(value: Address) -> Self {
        let fields = value.fields;
        Self {
            id: value.id.get(),
            line1: fields.line1.into(),
            line2: fields.line2.map(String::from),
            city: fields.city.map(String::from),
            state: fields.state.map(String::from),
            country: fields.country.map(String::from),
            postal_code: fields.postal_code.map(String::from),
            label: fields.label.map(String::from),
            is_primary: fields.is_primary,
        }
    }
}

/// Employee aggregate as rendered in responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub designation: Option<String>,
    pub department: EmployeeDepartmentResponse,
    pub phone_numbers: Vec<PhoneNumberResponse>,
    pub addresses: Vec<AddressResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeAggregate> for EmployeeResponse {
    fn from(value: EmployeeAggregate) -> Self {
        let employee = value.employee;
        Self {
            id: employee.id.get(),
            first_name: employee.first_name.into(),
            last_name: employee.last_name.map(String::from),
            email: employee.email.map(|email| email.as_str().to_owned()),
            date_of_birth: employee.date_of_birth,
            designation: employee.designation.map(String::from),
            department: EmployeeDepartmentResponse {
                id: value.department.id.get(),
                name: value.department.name.into(),
            },
            phone_numbers: value
                .phone_numbers
                .into_iter()
                .map(PhoneNumberResponse::from)
                .collect(),
            addresses: value
                .addresses
                .into_iter()
                .map(AddressResponse::from)
                .collect(),
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

fn employee_id(path: web::Path<i64>) -> Result<EmployeeId, Error> {
    parse_id(&FieldName::new("id"), path.into_inner()).map(EmployeeId::new)
}

/// Create an employee together with its phone numbers and addresses.
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid request or unknown department", body = ErrorSchema),
        (status = 409, description = "E-mail already in use", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: web::Json<CreateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let aggregate = NewEmployeeAggregate::try_from(payload.into_inner())?;
    let created = state.employees.create(aggregate).await?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(created)))
}

/// List every employee with department and contact details.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees ordered by id", body = [EmployeeResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<EmployeeResponse>>> {
    let employees = state.employees_query.list().await?;
    Ok(web::Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

/// Fetch one employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = i64, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Employee not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let id = employee_id(path)?;
    let employee = state.employees_query.get(id).await?;
    Ok(web::Json(employee.into()))
}

/// Reconcile an employee with the submitted target state.
///
/// Scalar fields, phone numbers and addresses change together or not at all.
#[utoipa::path(
    method(put, patch),
    path = "/api/v1/employees/{id}",
    params(("id" = i64, Path, description = "Employee identifier")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee after reconciliation", body = EmployeeResponse),
        (status = 400, description = "Invalid request or unknown department", body = ErrorSchema),
        (status = 404, description = "Employee not found", body = ErrorSchema),
        (status = 409, description = "E-mail already in use", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[route("/employees/{id}", method = "PUT", method = "PATCH")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateEmployeeRequest>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let id = employee_id(path)?;
    let request = payload.into_inner().into_reconciliation(id)?;
    debug!(
        employee_id = %id,
        phone_numbers = request.phone_numbers.as_ref().map(Vec::len),
        addresses = request.addresses.as_ref().map(Vec::len),
        "reconciliation requested"
    );
    let employee = state.employees.update(request).await?;
    Ok(web::Json(employee.into()))
}

/// Delete an employee together with its phone numbers and addresses.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = i64, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee deleted", body = DeletedResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Employee not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let id = employee_id(path)?;
    state.employees.delete(id).await?;
    Ok(web::Json(DeletedResponse::new("Employee deleted successfully")))
}

#[cfg(test)]
#[path = "employees_tests.rs"]
mod tests;
