use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, header};
use url::Url;

use crate::config::Config;
use crate::error::{CommandError, FetchError};
use crate::types::{HumidityPercent, HumidityResp, SensorReading, water_command_body};

/// HTTP access to the appliance's two endpoints. Cheap to clone.
#[derive(Clone)]
pub struct DeviceClient {
    http: Client,
    humidity_url: Url,
    water_url: Url,
}

impl DeviceClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .context("build http client")?;
        Self::with_client(http, &config.device_url)
    }

    /// `base` must end with `/`; see [`crate::config::parse_device_url`].
    pub fn with_client(http: Client, base: &Url) -> Result<Self> {
        Ok(DeviceClient {
            http,
            humidity_url: base.join("humidity").context("join /humidity")?,
            water_url: base.join("water").context("join /water")?,
        })
    }

    pub fn humidity_url(&self) -> &Url {
        &self.humidity_url
    }

    pub fn water_url(&self) -> &Url {
        &self.water_url
    }

    pub async fn fetch_reading(&self) -> Result<SensorReading, FetchError> {
        let response = self
            .http
            .get(self.humidity_url.clone())
            .send()
            .await
            .map_err(FetchError::Transport)?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        let parsed: HumidityResp = serde_json::from_str(&body).map_err(FetchError::Payload)?;
        Ok(SensorReading(parsed.humidity))
    }

    pub async fn fetch_humidity(&self) -> Result<HumidityPercent, FetchError> {
        self.fetch_reading().await.map(HumidityPercent::from)
    }

    /// Sends `1`/`0` to POST /water. Only 200 counts as accepted; the
    /// appliance's response body is returned for logging.
    pub async fn send_water(&self, desired: bool) -> Result<String, CommandError> {
        let response = self
            .http
            .post(self.water_url.clone())
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(water_command_body(desired))
            .send()
            .await
            .map_err(CommandError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CommandError::Rejected { status, body });
        }

        response.text().await.map_err(CommandError::Transport)
    }
}
