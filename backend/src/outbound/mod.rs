//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: an in-process store for local runs and tests.
//!
//! Adapters translate between domain types and storage representations. The
//! reconciliation rules live in the domain; adapters only supply the unit of
//! work it runs against.

pub mod memory;
pub mod persistence;
