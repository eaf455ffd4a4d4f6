use adapter::config::ServerConfig;
use adapter::functional::{handler, middleware};
use adapter::prelude::{adapt, Adapter, Handler, Middleware, Request, Response, Result};

async fn outer(req: Request, next: &dyn Handler) -> Result<Response> {
    println!("outer: before next");
    let res = next.handle(req).await;
    println!("outer: after next\n");
    res
}

async fn inner(req: Request, next: &dyn Handler) -> Result<Response> {
    println!("inner: before next");
    let res = next.handle(req).await;
    println!("inner: after next");
    res
}

#[tokio::main]
async fn main() -> Result<()> {
    let h = adapt(
        handler(|_: Request| async { println!("hello") }),
        vec![
            middleware(outer).into_adapter().boxed(),
            middleware(inner).into_adapter().boxed(),
        ],
    );
    let config = ServerConfig::default().addr("127.0.0.1:8080");
    h.into_server(config).run().await
}
