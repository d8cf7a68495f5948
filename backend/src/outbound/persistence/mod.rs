//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are backed by `diesel-async` connections drawn from a `bb8`
//! pool. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; only domain types cross the port boundary.
//!
//! # Example
//!
//! ```ignore
//! use personnel::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/personnel")).await?;
//! let employees = DieselEmployeeRepository::new(pool.clone());
//! ```

mod diesel_department_repository;
mod diesel_employee_repository;
mod diesel_helpers;
mod models;
mod pool;
mod schema;

pub use diesel_department_repository::DieselDepartmentRepository;
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
