//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use crate::domain::PagingConfig;
use crate::outbound::persistence::DbPool;

/// Failure while assembling a [`ServerConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `BIND_ADDR` did not parse as a socket address.
    #[error("invalid bind address {value:?}: {reason}")]
    InvalidBindAddr {
        /// Raw value taken from the environment.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// A page-size variable was not a positive integer.
    #[error("invalid page size for {name}: {value:?}")]
    InvalidPageSize {
        /// Environment variable name.
        name: &'static str,
        /// Raw value taken from the environment.
        value: String,
    },
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) paging: PagingConfig,
}

impl ServerConfig {
    /// Construct a server configuration over the given bind address and pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            paging: PagingConfig::default(),
        }
    }

    /// Override the listing and search page sizes.
    #[must_use]
    pub fn with_paging(mut self, paging: PagingConfig) -> Self {
        self.paging = paging;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Read the bind address from `BIND_ADDR`, defaulting to `0.0.0.0:8080`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBindAddr`] when the variable is set but
/// does not parse.
pub fn bind_addr_from_env() -> Result<SocketAddr, ConfigError> {
    match env::var("BIND_ADDR") {
        Ok(raw) => parse_bind_addr(&raw),
        Err(_) => Ok(SocketAddr::from(([0, 0, 0, 0], 8080))),
    }
}

/// Read page-size overrides from `ADMIN_PAGE_SIZE` and `SEARCH_PAGE_SIZE`.
///
/// Unset variables keep the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPageSize`] for a value that is not a
/// positive integer.
pub fn paging_from_env() -> Result<PagingConfig, ConfigError> {
    let mut paging = PagingConfig::default();
    if let Ok(raw) = env::var("ADMIN_PAGE_SIZE") {
        paging.admin_page_size = parse_page_size("ADMIN_PAGE_SIZE", &raw)?;
    }
    if let Ok(raw) = env::var("SEARCH_PAGE_SIZE") {
        paging.search_page_size = parse_page_size("SEARCH_PAGE_SIZE", &raw)?;
    }
    Ok(paging)
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.parse().map_err(|e: std::net::AddrParseError| {
        ConfigError::InvalidBindAddr {
            value: raw.to_owned(),
            reason: e.to_string(),
        }
    })
}

fn parse_page_size(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    match raw.parse::<i64>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPageSize {
            name,
            value: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_bind_addr, parse_page_size};

    #[rstest]
    #[case("127.0.0.1:9000")]
    #[case("0.0.0.0:8080")]
    fn accepts_valid_bind_addresses(#[case] raw: &str) {
        assert!(parse_bind_addr(raw).is_ok());
    }

    #[rstest]
    #[case("localhost:8080")]
    #[case("not an address")]
    fn rejects_invalid_bind_addresses(#[case] raw: &str) {
        assert!(parse_bind_addr(raw).is_err());
    }

    #[rstest]
    #[case("50", Some(50))]
    #[case("1", Some(1))]
    #[case("0", None)]
    #[case("-5", None)]
    #[case("lots", None)]
    fn page_sizes_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_page_size("ADMIN_PAGE_SIZE", raw).ok(), expected);
    }
}
