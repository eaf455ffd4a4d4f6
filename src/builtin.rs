//! Stock middleware. Each one becomes an adapter through
//! [`Middleware::into_adapter`].

use crate::error::{CatchExt, StatusError};
use crate::http::{HeaderName, HeaderValue, StatusCode};
use crate::internal_prelude::*;

use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

/// Appends a fixed header to every response produced downstream.
///
/// Errors pass through untouched. Put [`Recover`] after it in the chain to
/// give error responses the header too.
#[derive(Debug, Clone)]
pub struct SetHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl SetHeader {
    pub fn new(name: &str, value: &str) -> Result<Self> {
        Ok(Self {
            name: HeaderName::from_bytes(name.as_bytes())?,
            value: HeaderValue::from_str(value)?,
        })
    }
}

impl Middleware for SetHeader {
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
        Box::pin(async move {
            let mut res = next.handle(req).await?;
            res.headers_mut().append(self.name.clone(), self.value.clone());
            Ok(res)
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn error_response(status: StatusCode, message: String) -> Result<Response> {
    let body = ErrorBody {
        code: status.as_u16(),
        message,
    };
    Ok(Response::json(&body)?.with_status(status))
}

/// Turns downstream errors into json error responses.
///
/// A [`StatusError`] keeps its status. Anything else is a 500 whose body only
/// carries the reason phrase; the error itself goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recover;

impl Middleware for Recover {
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
        Box::pin(async move {
            match next.handle(req).await.catch::<StatusError>() {
                Ok(Ok(res)) => Ok(res),
                Ok(Err(e)) => error_response(e.status(), e.to_string()),
                Err(err) => {
                    error!(error = %err, "handler failed");
                    let status = StatusCode::INTERNAL_SERVER_ERROR;
                    let reason = status.canonical_reason().unwrap_or_default();
                    error_response(status, reason.to_owned())
                }
            }
        })
    }
}

/// Logs one line per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl Middleware for Trace {
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
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        Box::pin(async move {
            let start = Instant::now();
            let ret = next.handle(req).await;
            let elapsed = start.elapsed();
            match ret {
                Ok(ref res) => {
                    info!(%method, %path, status = res.status().as_u16(), ?elapsed, "request")
                }
                Err(ref err) => warn!(%method, %path, error = %err, ?elapsed, "request failed"),
            }
            ret
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::adapter::Adapter;
    use crate::chain::adapt;
    use crate::functional::handler;
    use crate::http::{header, Body, Method};

    async fn hello(_: Request) -> &'static str {
        "Hello, World."
    }

    async fn forbidden(_: Request) -> Result<Response> {
        Err(StatusError::FORBIDDEN.into())
    }

    async fn broken(_: Request) -> Result<Response> {
        Err(anyhow::anyhow!("database is gone"))
    }

    fn get(path: &str) -> Request {
        let req = hyper::Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        Request::from(req)
    }

    async fn json_body(res: Response) -> serde_json::Value {
        let body = hyper::body::to_bytes(res.into_hyper().into_body())
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn set_header_rejects_invalid_input() {
        assert!(SetHeader::new("bad header", "v").is_err());
        assert!(SetHeader::new("x-ok", "line\nbreak").is_err());
    }

    #[tokio::test]
    async fn set_header() {
        let greeting = SetHeader::new("vnd-adapter-example", "greetings").unwrap();
        let h = adapt(handler(hello), [greeting.into_adapter()]);

        let res = h.handle(get("/")).await.unwrap();
        assert_eq!(res.headers()["vnd-adapter-example"], "greetings");
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn set_header_appends() {
        let first = SetHeader::new("x-via", "a").unwrap().into_adapter();
        let second = SetHeader::new("x-via", "b").unwrap().into_adapter();
        let h = adapt(handler(hello), vec![first.boxed(), second.boxed()]);

        let res = h.handle(get("/")).await.unwrap();
        let values: Vec<_> = res.headers().get_all("x-via").iter().collect();
        assert_eq!(values, ["b", "a"]);
    }

    #[tokio::test]
    async fn recover_status_error() {
        let h = adapt(handler(forbidden), [Recover.into_adapter()]);

        let res = h.handle(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let body = json_body(res).await;
        assert_eq!(body["code"], 403);
        assert_eq!(body["message"], "403 Forbidden");
    }

    #[tokio::test]
    async fn recover_internal_error() {
        let h = adapt(handler(broken), [Recover.into_adapter()]);

        let res = h.handle(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(res).await;
        assert_eq!(body["code"], 500);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn trace_passes_result_through() {
        let h = adapt(handler(hello), [Trace.into_adapter()]);
        let res = h.handle(get("/hello")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let h = adapt(handler(broken), [Trace.into_adapter()]);
        assert!(h.handle(get("/hello")).await.is_err());
    }

    #[tokio::test]
    async fn recover_outside_set_header() {
        let h = adapt(
            handler(forbidden),
            vec![
                Recover.into_adapter().boxed(),
                SetHeader::new("x-seen", "1").unwrap().into_adapter().boxed(),
            ],
        );

        // the inner adapter never sees a response to decorate
        let res = h.handle(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(res.headers().get("x-seen").is_none());
    }

    #[tokio::test]
    async fn recover_inside_set_header() {
        let h = adapt(
            handler(broken),
            vec![
                SetHeader::new("vnd-adapter-example", "greetings")
                    .unwrap()
                    .into_adapter()
                    .boxed(),
                Recover.into_adapter().boxed(),
            ],
        );

        let res = h.handle(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.headers()["vnd-adapter-example"], "greetings");
    }
}
