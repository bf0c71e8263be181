use clap::Parser;
use std::time::Duration;

const DEFAULT_TAG: &str = "all";
const DEFAULT_LISTEN_ADDRESS: &str = ":8080";

/// Command-line flags, each falling back to an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "apprise-relay", version, about)]
pub struct Config {
    /// Apprise API URL that notifications are posted to
    #[arg(long = "apprise.url", env = "APPRISE_URL")]
    pub apprise_url: Option<String>,

    /// Apprise notification tag
    #[arg(long = "tag", env = "TAG", default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Address:Port to listen on
    #[arg(long = "listen.address", env = "LISTEN_ADDRESS", default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// Timeout in seconds for calls to Apprise; unset waits indefinitely
    #[arg(long = "apprise.timeout", env = "APPRISE_TIMEOUT")]
    pub apprise_timeout: Option<u64>,
}

impl Config {
    /// Parse flags and environment, after loading a `.env` file if one exists.
    pub fn load() -> crate::Result<Self> {
        let _ = dotenvy::dotenv();

        let config = Self::parse().with_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Treat empty values (e.g. `TAG=`) as unset so the defaults apply.
    pub fn with_defaults(mut self) -> Self {
        if self.apprise_url.as_deref() == Some("") {
            self.apprise_url = None;
        }
        if self.tag.is_empty() {
            self.tag = DEFAULT_TAG.to_string();
        }
        if self.listen_address.is_empty() {
            self.listen_address = DEFAULT_LISTEN_ADDRESS.to_string();
        }
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        let raw = match self.apprise_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(crate::Error::Config(
                    "apprise.url flag is required".to_string(),
                ))
            }
        };

        let url = url::Url::parse(raw)
            .map_err(|e| crate::Error::Config(format!("invalid apprise.url {raw:?}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(crate::Error::Config(format!(
                "apprise.url must be http or https, got {:?}",
                url.scheme()
            )));
        }

        self.bind_address()?;
        Ok(())
    }

    /// The validated Apprise URL, empty if unset.
    pub fn url(&self) -> &str {
        self.apprise_url.as_deref().unwrap_or_default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.apprise_timeout.map(Duration::from_secs)
    }

    /// Address to bind, as `host:port`. A bare `:port` binds every interface;
    /// host names are resolved at bind time.
    pub fn bind_address(&self) -> crate::Result<String> {
        let invalid = |reason: &str| {
            crate::Error::Config(format!(
                "invalid listen.address {:?}: {}",
                self.listen_address, reason
            ))
        };

        let (host, port) = self
            .listen_address
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected host:port"))?;
        port.parse::<u16>().map_err(|_| invalid("invalid port"))?;

        if host.is_empty() {
            Ok(format!("0.0.0.0:{port}"))
        } else {
            Ok(self.listen_address.clone())
        }
    }
}
