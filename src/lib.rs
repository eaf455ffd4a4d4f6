//! Compose http handlers out of ordered adapters.
//!
//! An [`Adapter`](adapter::Adapter) takes the next handler and returns the
//! handler that wraps it. [`adapt`](chain::adapt) applies a list of adapters
//! in source code order, so the chain reads the way it runs:
//!
//! ```ignore
//! let h = adapt(
//!     handler(hello),
//!     vec![
//!         Trace.into_adapter().boxed(),
//!         SetHeader::new("vnd-adapter-example", "greetings")?.into_adapter().boxed(),
//!     ],
//! );
//! ```

#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod builtin;
pub mod chain;
pub mod config;
pub mod error;
pub mod functional;
pub mod handler;
pub mod http;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub(crate) mod internal_prelude {
    pub use crate::error::{Error, Result};
    pub use crate::handler::Handler;
    pub use crate::middleware::Middleware;
    pub use crate::request::Request;
    pub use crate::response::Response;

    pub use std::future::Future;
    pub use std::pin::Pin;
    pub use std::task::{Context, Poll};

    pub use futures::future::BoxFuture;

    pub use hyper::Body;
    pub type HyperRequest = hyper::Request<Body>;
    pub type HyperResponse = hyper::Response<Body>;
    pub type HyperServer<I, S> = hyper::server::Server<I, S>;
}

pub use crate::chain::adapt;
pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::request::Request;
    pub use crate::response::{Responder, Response};

    pub use crate::adapter::*;
    pub use crate::chain::adapt;
    pub use crate::handler::*;
    pub use crate::middleware::*;

    pub use futures::future::BoxFuture;
}
