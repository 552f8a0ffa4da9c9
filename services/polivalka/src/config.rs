use anyhow::{Context, Result, bail};
use std::time::Duration;
use url::Url;

pub const DEFAULT_DEVICE_URL: &str = "http://192.168.130.154:5000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Appliance base address. Always ends with `/` so endpoint joins append.
    pub device_url: Url,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// Trimmed env value, or `default` when unset or blank.
pub fn read_env(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn read_secs(key: &str, default: u64) -> Result<Duration> {
    let raw = read_env(key, &default.to_string());
    let secs: u64 = raw
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}"))?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

/// Validates an appliance address and normalizes it to end with a slash.
pub fn parse_device_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("invalid device url {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("device url must be http or https, got {:?}", url.scheme());
    }
    if url.host_str().is_none() {
        bail!("device url {raw:?} has no host");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let device_url = parse_device_url(&read_env("POLIVALKA_DEVICE_URL", DEFAULT_DEVICE_URL))?;
        let request_timeout = read_secs("POLIVALKA_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let connect_timeout =
            read_secs("POLIVALKA_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        Ok(Config {
            device_url,
            request_timeout,
            connect_timeout,
        })
    }

    pub fn for_device(device_url: Url) -> Self {
        Config {
            device_url,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        unsafe {
            std::env::remove_var("POLIVALKA_DEVICE_URL");
            std::env::remove_var("POLIVALKA_HTTP_TIMEOUT_SECS");
            std::env::remove_var("POLIVALKA_CONNECT_TIMEOUT_SECS");
        }
    }

    #[test]
    #[serial_test::serial]
    fn defaults_when_unset() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.device_url.as_str(), "http://192.168.130.154:5000/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    #[serial_test::serial]
    fn env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("POLIVALKA_DEVICE_URL", " http://10.0.0.7:5000/api ");
            std::env::set_var("POLIVALKA_HTTP_TIMEOUT_SECS", "8");
        }
        let config = Config::from_env().unwrap();
        clear_env();
        assert_eq!(config.device_url.as_str(), "http://10.0.0.7:5000/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(8));
    }

    #[test]
    #[serial_test::serial]
    fn rejects_zero_timeout() {
        clear_env();
        unsafe {
            std::env::set_var("POLIVALKA_CONNECT_TIMEOUT_SECS", "0");
        }
        let result = Config::from_env();
        clear_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial_test::serial]
    fn blank_env_falls_back_to_default() {
        unsafe {
            std::env::set_var("POLIVALKA_TEST_BLANK", "   ");
        }
        let value = read_env("POLIVALKA_TEST_BLANK", "fallback");
        unsafe {
            std::env::remove_var("POLIVALKA_TEST_BLANK");
        }
        assert_eq!(value, "fallback");
    }

    #[test]
    fn device_url_validation() {
        assert!(parse_device_url("ftp://10.0.0.7").is_err());
        assert!(parse_device_url("not a url").is_err());
        let url = parse_device_url("https://plants.local").unwrap();
        assert_eq!(url.join("humidity").unwrap().as_str(), "https://plants.local/humidity");
    }
}
