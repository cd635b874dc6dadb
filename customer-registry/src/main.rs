use std::{sync::Arc, time::Duration};

use clap::Parser;
use common_utils::Logged;
use log::info;
use poem::{listener::TcpListener, Server};
use registry_api::CustomerService;

mod api;
mod ws;

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Opt {
    /// Server Listening Address
    #[clap(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    /// Reported Server Listening Address, it may differ from `http_addr` when the server is behind reversed proxy or NAT
    #[clap(long, env = "EXT_SERVER_ADDR")]
    pub ext_http_addr: Option<String>,

    /// Base Path of the API
    #[clap(long, env = "API_BASE", default_value = "/api")]
    pub api_base: String,

    /// Milliseconds to wait for one subscriber to take a snapshot, 0 waits forever
    #[clap(long, env = "DELIVERY_TIMEOUT_MS", default_value = "5000")]
    pub delivery_timeout_ms: u64,
}

impl Opt {
    fn delivery_timeout(&self) -> Option<Duration> {
        match self.delivery_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    common_utils::init_logger();

    // Parse the parameters passed by arguments.
    let options = Opt::parse();

    let ext_http_addr = options
        .ext_http_addr
        .clone()
        .unwrap_or_else(|| options.http_addr.clone());
    let http_addr = ext_http_addr
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .to_string();

    let store = sql_provider::load_store().await.log()?;
    info!("Customer store loaded: {:?}", store);
    let service = Arc::new(
        CustomerService::new(store).with_delivery_timeout(options.delivery_timeout()),
    );

    let route = api::build_route(service, &options.api_base, &http_addr);

    info!("Listening on {}", options.http_addr);
    Server::new(TcpListener::bind(
        options.http_addr.trim_start_matches("http://"),
    ))
    .run(route)
    .await
    .log()
    .map_err(anyhow::Error::from)
}
