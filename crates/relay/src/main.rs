use std::sync::Arc;
use tracing::{error, info};

use apprise_relay::{
    apprise::AppriseClient, config::Config, logging, metrics, server::Server, Result,
};

#[tokio::main]
async fn main() {
    logging::init_logging();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::load()?;
    let addr = config.bind_address()?;
    info!("Listening on {}", config.listen_address);
    info!("Apprise.url: {}", config.url());
    info!("Apprise.tag: {}", config.tag);

    metrics::register_metrics()?;

    let notifier = Arc::new(AppriseClient::new(config.url(), config.timeout())?);
    let server = Server::new(&config, notifier);
    server.start(&addr).await
}
