//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PERSONNEL_*` environment variables and
//! configuration files, in increasing order of precedence as OrthoConfig
//! defines it.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_owned()
}

/// Runtime settings for the personnel server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PERSONNEL")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: String,
    /// PostgreSQL connection string. Without one the server keeps its data
    /// in process memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
}

impl AppSettings {
    /// Configured listen address.
    ///
    /// # Errors
    /// Returns the parse failure when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.trim().parse()
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("personnel")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("PERSONNEL_BIND_ADDR", None::<String>),
            ("PERSONNEL_DATABASE_URL", None::<String>),
            ("PERSONNEL_DB_MAX_CONNECTIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PERSONNEL_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "PERSONNEL_DATABASE_URL",
                Some("postgres://personnel@localhost/personnel".to_owned()),
            ),
            ("PERSONNEL_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9090
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://personnel@localhost/personnel")
        );
        assert_eq!(settings.db_max_connections, 4);
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([
            ("PERSONNEL_BIND_ADDR", Some("not an address".to_owned())),
            ("PERSONNEL_DATABASE_URL", Some("   ".to_owned())),
            ("PERSONNEL_DB_MAX_CONNECTIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert!(settings.bind_addr().is_err());
    }
}
