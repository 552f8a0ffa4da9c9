use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::device::DeviceClient;
use crate::error::FetchError;
use crate::state::ControlState;
use crate::types::HumidityPercent;

pub const POLL_PERIOD: Duration = Duration::from_secs(5);

pub struct HumidityPoller {
    device: DeviceClient,
    state: ControlState,
    period: Duration,
}

impl HumidityPoller {
    pub fn new(device: DeviceClient, state: ControlState) -> Self {
        HumidityPoller {
            device,
            state,
            period: POLL_PERIOD,
        }
    }

    #[cfg(test)]
    fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// One read of the sensor. A failure is logged once, published as
    /// `Humidity::Unknown`, and returned; `unwrap_or_default()` on the result
    /// gives the legacy 0% reading. Dropping the future mid-request clears
    /// the polling marker and keeps the last reading.
    pub async fn poll(&self) -> Result<HumidityPercent, FetchError> {
        let in_flight = self.state.begin_poll();
        let result = self.device.fetch_humidity().await;
        match &result {
            Ok(percent) => tracing::debug!(humidity = %percent, "humidity updated"),
            Err(e) => {
                tracing::error!(error = %e, url = %self.device.humidity_url(), "humidity poll failed")
            }
        }
        in_flight.finish(&result);
        result
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Polls every period until `cancel` fires. The first poll happens one
    /// period after start. A poll already in flight is allowed to finish.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = self.period.as_millis() as u64, "humidity poller started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let _ = self.poll().await;
        }

        tracing::info!("humidity poller stopped");
    }
}
