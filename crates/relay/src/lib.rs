pub mod alertmanager;
pub mod apprise;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod translate;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Delivery error: {0}")]
    Delivery(#[from] apprise::DeliveryError),
}

pub type Result<T> = std::result::Result<T, Error>;
