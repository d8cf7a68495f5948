//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DepartmentCommand, DepartmentQuery, DepartmentRepository, EmployeeCommand, EmployeeQuery,
    EmployeeRepository,
};
use crate::domain::{DepartmentService, EmployeeService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Employee mutations.
    pub employees: Arc<dyn EmployeeCommand>,
    /// Employee reads.
    pub employees_query: Arc<dyn EmployeeQuery>,
    /// Department mutations.
    pub departments: Arc<dyn DepartmentCommand>,
    /// Department reads.
    pub departments_query: Arc<dyn DepartmentQuery>,
}

impl HttpState {
    /// Wire the domain services over a pair of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use personnel::inbound::http::state::HttpState;
    /// use personnel::outbound::memory::InMemoryDirectory;
    ///
    /// let store = Arc::new(InMemoryDirectory::new());
    /// let state = HttpState::from_repositories(store.clone(), store);
    /// # let _ = state;
    /// ```
    pub fn from_repositories<E, D>(employees: Arc<E>, departments: Arc<D>) -> Self
    where
        E: EmployeeRepository + 'static,
        D: DepartmentRepository + 'static,
    {
        let employee_service = Arc::new(EmployeeService::new(employees));
        let department_service = Arc::new(DepartmentService::new(departments));
        Self {
            employees: employee_service.clone(),
            employees_query: employee_service,
            departments: department_service.clone(),
            departments_query: department_service,
        }
    }
}
