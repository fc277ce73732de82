use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub scrape_api_url: String,
    pub scrape_api_key: Option<String>,
    pub scrape_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub user_agent: String,
    /// Remote `POST /convert` endpoint; `None` selects the in-process encoder.
    pub converter_url: Option<String>,
    pub brands_path: Option<PathBuf>,
    /// Overrides the default declared by the brands file when set.
    pub default_brand: Option<String>,
    pub items_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub quality: u8,
    pub inter_item_delay_ms: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("scrape_api_url", &self.scrape_api_url)
            .field(
                "scrape_api_key",
                &self.scrape_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("converter_url", &self.converter_url)
            .field("brands_path", &self.brands_path)
            .field("default_brand", &self.default_brand)
            .field("items_path", &self.items_path)
            .field("output_dir", &self.output_dir)
            .field("quality", &self.quality)
            .field("inter_item_delay_ms", &self.inter_item_delay_ms)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
