pub use anyhow::{Error, Result};

use crate::http::{Body, StatusCode};
use crate::response::{Responder, Response};

use std::time::Duration;

use futures::future::{self, Ready};

pub trait CatchExt {
    type Value;
    type Error;
    fn catch<E>(self) -> Result<Result<Self::Value, E>, Self::Error>
    where
        E: std::error::Error + Send + Sync + 'static;
}

impl<T> CatchExt for Result<T> {
    type Value = T;
    type Error = Error;

    fn catch<E>(self) -> Result<Result<Self::Value, E>, Self::Error>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(Ok(value)),
            Err(err) => match err.downcast::<E>() {
                Ok(e) => Ok(Err(e)),
                Err(err) => Err(err),
            },
        }
    }
}

/// An http status raised as an error.
///
/// Handlers and adapters return it to reject a request with a specific status
/// without building the response themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0)]
pub struct StatusError(pub StatusCode);

impl StatusError {
    pub const BAD_REQUEST: Self = Self(StatusCode::BAD_REQUEST);
    pub const UNAUTHORIZED: Self = Self(StatusCode::UNAUTHORIZED);
    pub const FORBIDDEN: Self = Self(StatusCode::FORBIDDEN);
    pub const NOT_FOUND: Self = Self(StatusCode::NOT_FOUND);
    pub const INTERNAL_SERVER_ERROR: Self = Self(StatusCode::INTERNAL_SERVER_ERROR);

    pub fn status(&self) -> StatusCode {
        self.0
    }
}

impl From<StatusError> for Response {
    fn from(e: StatusError) -> Self {
        let status = e.status();
        let body = Body::from(status.canonical_reason().unwrap_or_default());
        Response::new(status, body)
    }
}

impl Responder for StatusError {
    type Future = Ready<Result<Response>>;

    fn respond(self) -> Self::Future {
        future::ready(Ok(self.into()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("InvalidAddr: {:?}", .addr)]
    InvalidAddr { addr: String },
    #[error("WriteTimeout: no response within {:?}", .timeout)]
    WriteTimeout { timeout: Duration },
}

#[test]
fn catch_status_error() {
    let ret: Result<()> = Err(StatusError::FORBIDDEN.into());
    assert_eq!(ret.catch::<StatusError>().unwrap(), Err(StatusError::FORBIDDEN));

    let ret: Result<()> = Err(anyhow::anyhow!("boom"));
    assert!(ret.catch::<StatusError>().is_err());

    let ret: Result<u8> = Ok(1);
    assert_eq!(ret.catch::<StatusError>().unwrap(), Ok(1));
}
