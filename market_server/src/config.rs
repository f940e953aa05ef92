use std::env;

use log::*;
use market_common::{parse_boolean_flag, Secret};

const DEFAULT_MKT_HOST: &str = "127.0.0.1";
const DEFAULT_MKT_PORT: u16 = 8470;
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    /// SMTP settings for the order notification mailer.
    pub mail: MailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MKT_HOST.to_string(),
            port: DEFAULT_MKT_PORT,
            database_url: String::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            mail: MailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MKT_HOST").ok().unwrap_or_else(|| DEFAULT_MKT_HOST.into());
        let port = env::var("MKT_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MKT_PORT. {e} Using the default, {DEFAULT_MKT_PORT}, instead."
                    );
                    DEFAULT_MKT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MKT_PORT);
        let database_url = env::var("MKT_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ MKT_DATABASE_URL is not set. Please set it to the URL for the marketplace database.");
            String::default()
        });
        let use_x_forwarded_for = parse_boolean_flag(env::var("MKT_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("MKT_USE_FORWARDED").ok(), false);
        let mail = MailConfig::from_env_or_default();
        Self { host, port, database_url, use_x_forwarded_for, use_forwarded, mail }
    }
}

//-------------------------------------------------  MailConfig  ------------------------------------------------------
/// SMTP settings for order notifications. When no relay host is configured the mailer runs in log-only mode, which
/// is the sane default for development setups.
#[derive(Clone, Debug, Default)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: Secret<String>,
    pub from_address: String,
}

impl MailConfig {
    pub fn from_env_or_default() -> Self {
        let smtp_host = env::var("MKT_SMTP_HOST").ok().filter(|s| !s.trim().is_empty());
        if smtp_host.is_none() {
            info!("🪛️ MKT_SMTP_HOST is not set. Order notifications will be logged instead of emailed.");
        }
        let smtp_port = env::var("MKT_SMTP_PORT")
            .ok()
            .and_then(|s| {
                s.parse::<u16>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for MKT_SMTP_PORT. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_SMTP_PORT);
        let smtp_username = env::var("MKT_SMTP_USERNAME").ok().unwrap_or_default();
        let smtp_password = Secret::new(env::var("MKT_SMTP_PASSWORD").ok().unwrap_or_default());
        let from_address = env::var("MKT_SMTP_FROM").ok().unwrap_or_else(|| {
            if smtp_host.is_some() {
                warn!("🪛️ MKT_SMTP_FROM is not set. Using a placeholder sender address.");
            }
            "marketplace@example.com".to_string()
        });
        Self { smtp_host, smtp_port, smtp_username, smtp_password, from_address }
    }
}

//-------------------------------------------------  ProxyConfig  -----------------------------------------------------
/// The subset of the server configuration that request handlers need to resolve client addresses. Kept small, and
/// free of secrets, so it can be copied into the app data of every worker.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProxyConfig {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ProxyConfig {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
