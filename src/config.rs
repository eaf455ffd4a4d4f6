use crate::error::ServerError;
use crate::internal_prelude::*;

use std::convert::TryFrom;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use serde::Deserialize;

/// Listener settings for [`Server`](crate::server::Server).
///
/// Missing fields in a JSON document fall back to [`ServerConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: Self::DEFAULT_ADDR.into(),
            read_timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            write_timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    const DEFAULT_ADDR: &'static str = "0.0.0.0:8081";
    const DEFAULT_TIMEOUT_MS: u64 = 5_000;

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = to_millis(timeout);
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout_ms = to_millis(timeout);
        self
    }

    pub fn read_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub(crate) fn socket_addr(&self) -> Result<SocketAddr> {
        let invalid = || ServerError::InvalidAddr {
            addr: self.addr.clone(),
        };
        let mut addrs = self.addr.to_socket_addrs().map_err(|_| invalid())?;
        Ok(addrs.next().ok_or_else(invalid)?)
    }
}

/// Sub-millisecond timeouts become 1ms, so a non-zero timeout never means "no timeout".
fn to_millis(timeout: Duration) -> u64 {
    let ms = timeout.as_millis();
    let ms = if ms == 0 && timeout > Duration::from_millis(0) {
        1
    } else {
        ms
    };
    u64::try_from(ms).unwrap_or(u64::MAX)
}
