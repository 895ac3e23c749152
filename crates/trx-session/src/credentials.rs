//! Store login parsing.
//!
//! Credentials travel as a single `user/password@datasource` string, the
//! datasource being `host[:port]/dbname`. Port defaults to 5432.

use crate::error::SessionError;
use std::fmt;

const DEFAULT_PORT: u16 = 5432;

/// Parsed store login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub datasource: String,
}

impl Credentials {
    /// Parse a `user/password@datasource` string.
    pub fn parse(cred: &str) -> Result<Self, SessionError> {
        let (login, datasource) = cred.split_once('@').ok_or_else(|| {
            SessionError::Credentials("expected user/password@datasource".to_string())
        })?;
        let (username, password) = login.split_once('/').ok_or_else(|| {
            SessionError::Credentials("expected user/password before '@'".to_string())
        })?;
        if username.is_empty() || password.is_empty() || datasource.is_empty() {
            return Err(SessionError::Credentials(
                "user, password and datasource must be non-empty".to_string(),
            ));
        }
        Ok(Self::from_parts(username, password, datasource))
    }

    /// Build credentials from the three parts directly.
    pub fn from_parts(username: &str, password: &str, datasource: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            datasource: datasource.to_string(),
        }
    }

    /// Render a `tokio-postgres` connection string.
    pub fn connection_string(&self) -> Result<String, SessionError> {
        let (host_port, dbname) = self.datasource.split_once('/').ok_or_else(|| {
            SessionError::Credentials(format!(
                "datasource {:?} is not host[:port]/dbname",
                self.datasource
            ))
        })?;
        let (host, port) = match host_port.split_once(':') {
            Some((host, port)) => {
                let port: u16 = port.parse().map_err(|_| {
                    SessionError::Credentials(format!("invalid port in datasource {host_port:?}"))
                })?;
                (host, port)
            }
            None => (host_port, DEFAULT_PORT),
        };
        if host.is_empty() || dbname.is_empty() {
            return Err(SessionError::Credentials(format!(
                "datasource {:?} is missing host or dbname",
                self.datasource
            )));
        }
        Ok(format!(
            "host={host} port={port} user={} password={} dbname={dbname}",
            self.username, self.password
        ))
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/***@{}", self.username, self.datasource)
    }
}
