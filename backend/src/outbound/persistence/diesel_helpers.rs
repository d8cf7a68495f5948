//! Error mapping shared by the Diesel repositories.
//!
//! Constraint violations the domain cares about (duplicate e-mail, deleting a
//! department that still has employees) become dedicated port errors. Other
//! database failures are logged at debug level and reduced to a generic
//! message so SQL text never reaches API clients.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::{DepartmentRepositoryError, EmployeeRepositoryError};

use super::models::CorruptRow;
use super::pool::PoolError;

const EMPLOYEE_EMAIL_CONSTRAINT: &str = "employees_email_key";

fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn log_diesel_error(error: &DieselError, operation: &str) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            %operation,
            "diesel operation failed"
        ),
    }
}

/// Classification of a Diesel failure shared by both port error types.
enum Failure {
    Connection,
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation,
    Query(&'static str),
}

fn classify(error: DieselError, operation: &str) -> Failure {
    log_diesel_error(&error, operation);
    match error {
        DieselError::NotFound => Failure::Query("record not found"),
        DieselError::QueryBuilderError(_) => Failure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::ClosedConnection => Failure::Connection,
            DatabaseErrorKind::UniqueViolation => Failure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ForeignKeyViolation => Failure::ForeignKeyViolation,
            _ => Failure::Query("database error"),
        },
        _ => Failure::Query("database error"),
    }
}

/// Map pool errors to employee repository errors.
pub(crate) fn map_employee_pool_error(error: PoolError) -> EmployeeRepositoryError {
    EmployeeRepositoryError::connection(pool_message(error))
}

/// Map pool errors to department repository errors.
pub(crate) fn map_department_pool_error(error: PoolError) -> DepartmentRepositoryError {
    DepartmentRepositoryError::connection(pool_message(error))
}

/// Map Diesel errors raised while reading or writing employees.
///
/// `email` is the address being written, if any; it is reported back when
/// the unique e-mail constraint fires.
pub(crate) fn map_employee_diesel_error(
    error: DieselError,
    operation: &str,
    email: Option<&str>,
) -> EmployeeRepositoryError {
    match classify(error, operation) {
        Failure::Connection => EmployeeRepositoryError::connection("database connection error"),
        Failure::UniqueViolation { constraint }
            if constraint.as_deref() == Some(EMPLOYEE_EMAIL_CONSTRAINT) =>
        {
            EmployeeRepositoryError::duplicate_email(email.unwrap_or_default())
        }
        Failure::UniqueViolation { constraint } => {
            warn!(?constraint, "unrecognised unique violation on employee write");
            EmployeeRepositoryError::query("unique constraint violation")
        }
        Failure::ForeignKeyViolation => {
            EmployeeRepositoryError::query("foreign key violation")
        }
        Failure::Query(message) => EmployeeRepositoryError::query(message),
    }
}

/// Map Diesel errors raised while reading or writing departments.
///
/// A foreign key violation can only come from `employees.department_id`
/// when deleting, so it is reported as [`DepartmentRepositoryError::InUse`].
pub(crate) fn map_department_diesel_error(
    error: DieselError,
    operation: &str,
    id: Option<i64>,
) -> DepartmentRepositoryError {
    match (classify(error, operation), id) {
        (Failure::Connection, _) => {
            DepartmentRepositoryError::connection("database connection error")
        }
        (Failure::ForeignKeyViolation, Some(id)) => DepartmentRepositoryError::in_use(id),
        (Failure::ForeignKeyViolation, None) => {
            DepartmentRepositoryError::query("foreign key violation")
        }
        (Failure::UniqueViolation { .. }, _) => {
            DepartmentRepositoryError::query("unique constraint violation")
        }
        (Failure::Query(message), _) => DepartmentRepositoryError::query(message),
    }
}

/// Report a row that failed domain validation.
pub(crate) fn map_corrupt_row(error: CorruptRow) -> EmployeeRepositoryError {
    warn!(%error, "stored employee data failed validation");
    EmployeeRepositoryError::query(error.to_string())
}

/// Report a department row that failed domain validation.
pub(crate) fn map_corrupt_department(error: CorruptRow) -> DepartmentRepositoryError {
    warn!(%error, "stored department data failed validation");
    DepartmentRepositoryError::query(error.to_string())
}
