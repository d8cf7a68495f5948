//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod departments;
pub mod employees;
pub mod error;
pub mod health;
pub mod responses;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every resource handler. Mount under `/api/v1`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use personnel::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(employees::create_employee)
        .service(employees::list_employees)
        .service(employees::get_employee)
        .service(employees::update_employee)
        .service(employees::delete_employee)
        .service(departments::create_department)
        .service(departments::list_departments)
        .service(departments::get_department)
        .service(departments::update_department)
        .service(departments::delete_department);
}
