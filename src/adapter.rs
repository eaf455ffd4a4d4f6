use crate::handler::Handler;
use crate::middleware::Middleware;

use std::sync::Arc;

/// A function from a downstream handler to the handler that wraps it.
///
/// Adapters are applied by [`adapt`](crate::chain::adapt). The wrapping handler
/// decides whether, when and how often the downstream handler runs.
pub trait Adapter: Send + Sync {
    fn adapt(&self, next: Box<dyn Handler>) -> Box<dyn Handler>;

    fn boxed(self) -> Box<dyn Adapter>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl Adapter for Box<dyn Adapter> {
    fn adapt(&self, next: Box<dyn Handler>) -> Box<dyn Handler> {
        Adapter::adapt(&**self, next)
    }

    fn boxed(self) -> Box<dyn Adapter>
    where
        Self: Sized + 'static,
    {
        self
    }
}

impl<A> Adapter for &'_ A
where
    A: Adapter + ?Sized,
{
    fn adapt(&self, next: Box<dyn Handler>) -> Box<dyn Handler> {
        Adapter::adapt(&**self, next)
    }
}

pub struct MiddlewareAdapter<M> {
    m: Arc<M>,
}

impl<M> MiddlewareAdapter<M> {
    pub fn new(middleware: M) -> Self {
        Self {
            m: Arc::new(middleware),
        }
    }
}

impl<M> Adapter for MiddlewareAdapter<M>
where
    M: Middleware + 'static,
{
    fn adapt(&self, next: Box<dyn Handler>) -> Box<dyn Handler> {
        next.wrap(Arc::clone(&self.m)).boxed()
    }
}
