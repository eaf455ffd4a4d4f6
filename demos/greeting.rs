use adapter::builtin::{Recover, SetHeader, Trace};
use adapter::config::ServerConfig;
use adapter::functional::handler;
use adapter::prelude::{adapt, Adapter, Handler, Middleware, Request, Result};

use tracing_subscriber::EnvFilter;

async fn serve_index(_: Request) -> &'static str {
    "Hello, World."
}

fn version_adapter(greeting: &str) -> Result<impl Adapter> {
    Ok(SetHeader::new("vnd-adapter-example", greeting)?.into_adapter())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let h = adapt(
        handler(serve_index),
        vec![
            Trace.into_adapter().boxed(),
            version_adapter("greetings")?.boxed(),
            Recover.into_adapter().boxed(),
        ],
    );

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ServerConfig::default(),
    };

    h.into_server(config)
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
