//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed personnel records used by the API and
//! persistence layers, and the services that enforce their invariants.
//! Validation happens once, when raw input becomes a domain value; code
//! holding a [`PersonName`] or [`EmailAddress`] may assume it is well formed.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`EmployeeAggregate`]: an employee with department, phone numbers and
//!   addresses.
//! - [`reconcile_employee`]: the aggregate reconciliation algorithm.
//! - [`EmployeeService`] and [`DepartmentService`]: driving port
//!   implementations.

mod contact;
mod department;
mod department_service;
mod employee;
mod employee_service;
pub mod error;
mod ids;
pub mod ports;
mod reconcile;
mod text;
mod trace_id;

pub use self::contact::{
    Address, AddressFields, AddressSubmission, ChildSubmission, PhoneNumber, PhoneNumberFields,
    PhoneNumberSubmission,
};
pub use self::department::{Department, DepartmentSummary};
pub use self::department_service::DepartmentService;
pub use self::employee::{
    Employee, EmployeeAggregate, EmployeePatch, EmployeeReconciliation, NewEmployee,
    NewEmployeeAggregate,
};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{AddressId, DepartmentId, EmployeeId, PhoneNumberId};
pub use self::reconcile::{create_employee, reconcile_employee};
pub use self::text::{
    AddressLine, ContactLabel, DepartmentName, Designation, EmailAddress, Locality, PersonName,
    PhoneValue, PostalCode, TextError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use personnel::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
