use crate::adapter::MiddlewareAdapter;
use crate::handler::Handler;
use crate::internal_prelude::*;

use std::sync::Arc;

/// Work that runs around a downstream handler.
///
/// Calling `next` is optional: a middleware that returns without calling it
/// ends the chain at that point.
pub trait Middleware: Send + Sync {
    fn handle<'t, 'n, 'a>(
        &'t self,
        req: Request,
        next: &'n dyn Handler,
    ) -> BoxFuture<'a, Result<Response>>
    where
        't: 'a,
        'n: 'a,
        Self: 'a;

    fn boxed(self) -> Box<dyn Middleware>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Turns this middleware into an [`Adapter`](crate::adapter::Adapter)
    /// that can be applied to any number of chains.
    fn into_adapter(self) -> MiddlewareAdapter<Self>
    where
        Self: Sized + 'static,
    {
        MiddlewareAdapter::new(self)
    }
}

impl Middleware for Box<dyn Middleware> {
    fn handle<'t, 'n, 'a>(
        &'t self,
        req: Request,
        next: &'n dyn Handler,
    ) -> BoxFuture<'a, Result<Response>>
    where
        't: 'a,
        'n: 'a,
        Self: 'a,
    {
        Middleware::handle(&**self, req, next)
    }
}

impl<M> Middleware for Arc<M>
where
    M: Middleware + ?Sized,
{
    fn handle<'t, 'n, 'a>(
        &'t self,
        req: Request,
        next: &'n dyn Handler,
    ) -> BoxFuture<'a, Result<Response>>
    where
        't: 'a,
        'n: 'a,
        Self: 'a,
    {
        Middleware::handle(&**self, req, next)
    }
}
