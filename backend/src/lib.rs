//! Personnel directory backend.
//!
//! Employees, their phone numbers and addresses, and the departments they
//! belong to, served over a JSON REST API. Storage is PostgreSQL through
//! Diesel, or an in-process store when no database is configured.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
