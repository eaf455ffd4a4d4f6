use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::Handler;
use crate::internal_prelude::*;

use std::net::TcpListener;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future;
use tracing::{info, warn};

struct ServerInner {
    handler: Box<dyn Handler>,
    config: ServerConfig,
}

async fn hyper_call(server: &ServerInner, req: HyperRequest) -> Result<HyperResponse> {
    let req = Request::from_hyper(req);
    let fut = server.handler.handle(req);

    let res = match nonzero(server.config.write_timeout_duration()) {
        None => fut.await?,
        Some(timeout) => match tokio::time::timeout(timeout, fut).await {
            Ok(ret) => ret?,
            Err(_) => {
                warn!(?timeout, "no response before write timeout, dropping connection");
                return Err(ServerError::WriteTimeout { timeout }.into());
            }
        },
    };

    Ok(res.into_hyper())
}

/// A zero timeout means no timeout.
fn nonzero(timeout: Duration) -> Option<Duration> {
    if timeout == Duration::from_secs(0) {
        None
    } else {
        Some(timeout)
    }
}

pub struct Server {
    inner: Arc<ServerInner>,
}

impl Server {
    pub fn new(handler: Box<dyn Handler>, config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(ServerInner { handler, config }),
        }
    }

    pub async fn run(self) -> Result<()> {
        self.run_until(future::pending()).await
    }

    /// Serves until `shutdown` resolves, then waits for in-flight requests.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let listener = TcpListener::bind(self.inner.config.socket_addr()?)?;
        self.serve(listener, shutdown).await
    }

    /// Like [`run_until`](Self::run_until), on a listener bound by the caller.
    /// The configured address is ignored.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        let config = &self.inner.config;
        let local_addr = listener.local_addr()?;

        let mut builder = HyperServer::from_tcp(listener)?;
        if let Some(timeout) = nonzero(config.read_timeout_duration()) {
            builder = builder.http1_header_read_timeout(timeout);
        }

        info!(addr = %local_addr, "listening");
        let hyper_server = builder.serve(self).with_graceful_shutdown(shutdown);
        hyper_server.await?;
        info!(addr = %local_addr, "server stopped");
        Ok(())
    }
}

impl hyper::service::Service<HyperRequest> for Server {
    type Response = HyperResponse;
    type Error = crate::error::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: HyperRequest) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { hyper_call(&*inner, req).await })
    }
}

impl hyper::service::Service<&'_ hyper::server::conn::AddrStream> for Server {
    type Response = Self;
    type Error = anyhow::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: &'_ hyper::server::conn::AddrStream) -> Self::Future {
        future::ready(Ok(Self {
            inner: Arc::clone(&self.inner),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::functional::handler;
    use crate::http::{Body, StatusCode};

    use hyper::service::Service;

    async fn hello(_: Request) -> &'static str {
        "Hello, World."
    }

    async fn stall(_: Request) -> &'static str {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        "too late"
    }

    fn call(server: &mut Server) -> BoxFuture<'static, Result<HyperResponse>> {
        let req = hyper::Request::new(Body::empty());
        <Server as Service<HyperRequest>>::call(server, req)
    }

    #[tokio::test]
    async fn serves_handler_response() {
        let mut server = handler(hello).into_server(ServerConfig::default());

        let res = call(&mut server).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        assert_eq!(&body[..], b"Hello, World.");
    }

    #[tokio::test(start_paused = true)]
    async fn write_timeout() {
        let config = ServerConfig::default().write_timeout(Duration::from_secs(5));
        let mut server = handler(stall).into_server(config);

        let err = call(&mut server).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServerError>(),
            Some(ServerError::WriteTimeout { timeout }) if *timeout == Duration::from_secs(5)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_write_timeout_waits() {
        let config = ServerConfig::default().write_timeout(Duration::from_secs(0));
        let mut server = handler(stall).into_server(config);

        let res = call(&mut server).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn read_timeout_closes_stalled_connection() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::sync::oneshot;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let config = ServerConfig::default().read_timeout(Duration::from_millis(200));
        let server = handler(hello).into_server(config);
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve(listener, async {
            let _ = stopped.await;
        }));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\nHost: local").await.unwrap();

        let mut buf = Vec::new();
        let closed = tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut buf))
            .await;
        assert!(closed.is_ok(), "connection stayed open past the read timeout");
        assert!(!buf.starts_with(b"HTTP/1.1 200"));

        let _ = stop.send(());
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn complete_request_over_tcp() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let config = ServerConfig::default().read_timeout(Duration::from_secs(5));
        let server = handler(hello).into_server(config);
        tokio::spawn(server.serve(listener, future::pending()));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: local\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.1 200 OK"));
        assert!(text.ends_with("Hello, World."));
    }

    #[tokio::test]
    async fn run_until_shutdown() {
        let config = ServerConfig::default().addr("127.0.0.1:0");
        let server = handler(hello).into_server(config);
        server.run_until(future::ready(())).await.unwrap();
    }
}
