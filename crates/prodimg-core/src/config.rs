use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PRODIMG_ENV", "development"))?;

    let bind_addr = or_default("PRODIMG_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PRODIMG_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PRODIMG_LOG_LEVEL", "info");

    let scrape_api_url = or_default("PRODIMG_SCRAPE_API_URL", "https://api.firecrawl.dev/v1");
    if !scrape_api_url.starts_with("http://") && !scrape_api_url.starts_with("https://") {
        return Err(invalid(
            "PRODIMG_SCRAPE_API_URL",
            format!("expected an http(s) URL, got \"{scrape_api_url}\""),
        ));
    }
    let scrape_api_key = optional("FIRECRAWL_API_KEY");
    let scrape_timeout_secs = parse_u64("PRODIMG_SCRAPE_TIMEOUT_SECS", "60")?;
    let download_timeout_secs = parse_u64("PRODIMG_DOWNLOAD_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PRODIMG_USER_AGENT", "prodimg/0.1 (catalog-images)");
    let converter_url = optional("PRODIMG_CONVERTER_URL");

    let brands_path = optional("PRODIMG_BRANDS_PATH").map(PathBuf::from);
    let default_brand = optional("PRODIMG_DEFAULT_BRAND");
    let items_path = optional("PRODIMG_ITEMS_PATH").map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("PRODIMG_OUTPUT_DIR", "./converted-images"));

    let quality = parse_quality(&or_default("PRODIMG_QUALITY", "80"))
        .map_err(|reason| invalid("PRODIMG_QUALITY", reason))?;
    let inter_item_delay_ms = parse_u64("PRODIMG_INTER_ITEM_DELAY_MS", "2000")?;
    let rate_limit_per_minute = parse_usize("PRODIMG_RATE_LIMIT_PER_MINUTE", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        scrape_api_url,
        scrape_api_key,
        scrape_timeout_secs,
        download_timeout_secs,
        user_agent,
        converter_url,
        brands_path,
        default_brand,
        items_path,
        output_dir,
        quality,
        inter_item_delay_ms,
        rate_limit_per_minute,
    })
}

/// Parse a WebP quality value, accepting only `1..=100`.
///
/// # Errors
///
/// Returns a human-readable reason when the value is not an integer in range.
pub fn parse_quality(raw: &str) -> Result<u8, String> {
    let value = raw.trim().parse::<u8>().map_err(|e| e.to_string())?;
    if (1..=100).contains(&value) {
        Ok(value)
    } else {
        Err(format!("quality must be between 1 and 100, got {value}"))
    }
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PRODIMG_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
