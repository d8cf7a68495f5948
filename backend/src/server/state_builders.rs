//! Builders selecting the storage adapters behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use personnel::inbound::http::state::HttpState;
use personnel::outbound::memory::InMemoryDirectory;
use personnel::outbound::persistence::{
    DbPool, DieselDepartmentRepository, DieselEmployeeRepository,
};

use super::ServerConfig;

fn build_from_pool(pool: &DbPool) -> HttpState {
    HttpState::from_repositories(
        Arc::new(DieselEmployeeRepository::new(pool.clone())),
        Arc::new(DieselDepartmentRepository::new(pool.clone())),
    )
}

fn build_in_memory() -> HttpState {
    warn!("no database configured; records are kept in memory and lost on restart");
    let store = Arc::new(InMemoryDirectory::new());
    HttpState::from_repositories(store.clone(), store)
}

/// Build the shared HTTP state, using PostgreSQL when a pool is configured
/// and the in-process store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => build_from_pool(pool),
        None => build_in_memory(),
    };
    web::Data::new(state)
}
