use crate::config::ServerConfig;
use crate::internal_prelude::*;
use crate::middleware::Middleware;
use crate::server::Server;

/// An async unit of work that turns a [`Request`] into a [`Response`].
pub trait Handler: Send + Sync {
    fn handle<'t, 'a>(&'t self, req: Request) -> BoxFuture<'a, Result<Response>>
    where
        't: 'a,
        Self: 'a;

    /// Runs `middleware` around this handler.
    fn wrap<M>(self, middleware: M) -> Wrap<Self, M>
    where
        Self: Sized,
        M: Middleware,
    {
        Wrap {
            h: self,
            m: middleware,
        }
    }

    fn boxed(self) -> Box<dyn Handler>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    fn into_server(self, config: ServerConfig) -> Server
    where
        Self: Sized + 'static,
    {
        Server::new(self.boxed(), config)
    }
}

impl Handler for Box<dyn Handler> {
    fn handle<'t, 'a>(&'t self, req: Request) -> BoxFuture<'a, Result<Response>>
    where
        't: 'a,
        Self: 'a,
    {
        Handler::handle(&**self, req)
    }

    fn boxed(self) -> Box<dyn Handler>
    where
        Self: Sized + 'static,
    {
        self
    }
}

pub struct Wrap<H, M> {
    h: H,
    m: M,
}

impl<H, M> Handler for Wrap<H, M>
where
    H: Handler,
    M: Middleware,
{
    fn handle<'t, 'a>(&'t self, req: Request) -> BoxFuture<'a, Result<Response>>
    where
        't: 'a,
        Self: 'a,
    {
        self.m.handle(req, &self.h)
    }
}
