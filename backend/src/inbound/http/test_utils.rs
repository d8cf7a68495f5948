//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MockDepartmentCommand, MockDepartmentQuery, MockEmployeeCommand, MockEmployeeQuery,
};
use crate::domain::{
    Department, DepartmentId, DepartmentName, DepartmentSummary, Employee, EmployeeAggregate,
    EmployeeId, PersonName, PhoneNumber, PhoneNumberFields, PhoneNumberId, PhoneValue,
};
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::configure_api;

/// Mocked driving ports. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub employees: MockEmployeeCommand,
    pub employees_query: MockEmployeeQuery,
    pub departments: MockDepartmentCommand,
    pub departments_query: MockDepartmentQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            employees: Arc::new(self.employees),
            employees_query: Arc::new(self.employees_query),
            departments: Arc::new(self.departments),
            departments_query: Arc::new(self.departments_query),
        }
    }
}

/// Build an application exposing every resource handler under `/api/v1`,
/// with the same extractor error handlers as the server.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(web::scope("/api/v1").configure(configure_api))
}

pub fn department(id: i64, name: &str) -> Department {
    Department {
        id: DepartmentId::new(id),
        name: DepartmentName::new(name).expect("valid department name"),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Employee 1 in department 1 with phone numbers "111" (id 1) and "222"
/// (id 2) and no addresses.
pub fn sample_aggregate() -> EmployeeAggregate {
    let id = EmployeeId::new(1);
    let phone = |raw: i64, value: &str| PhoneNumber {
        id: PhoneNumberId::new(raw),
        employee_id: id,
        fields: PhoneNumberFields::new(PhoneValue::new(value).expect("valid phone")),
    };
    EmployeeAggregate {
        employee: Employee {
            id,
            first_name: PersonName::new("Ada").expect("valid name"),
            last_name: PersonName::new("Lovelace").ok(),
            email: None,
            date_of_birth: None,
            designation: None,
            department_id: DepartmentId::new(1),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        },
        department: DepartmentSummary::from(&department(1, "Engineering")),
        phone_numbers: vec![phone(1, "111"), phone(2, "222")],
        addresses: Vec::new(),
    }
}
