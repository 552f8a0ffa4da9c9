use tokio::sync::Mutex;

use crate::device::DeviceClient;
use crate::error::CommandError;
use crate::state::ControlState;

/// Issues on/off commands. At most one command is in flight; local state
/// follows the appliance only after it answers 200.
pub struct WateringCommander {
    device: DeviceClient,
    state: ControlState,
    in_flight: Mutex<()>,
}

impl WateringCommander {
    pub fn new(device: DeviceClient, state: ControlState) -> Self {
        WateringCommander {
            device,
            state,
            in_flight: Mutex::new(()),
        }
    }

    /// Every call goes to the appliance, even when `desired` already matches
    /// the local flag. If the future is dropped before the appliance answers,
    /// the flag stays as it was.
    pub async fn set_watering(&self, desired: bool) -> Result<(), CommandError> {
        let _guard = self.in_flight.lock().await;
        self.issue(desired).await
    }

    /// Sends the negation of the currently displayed flag and returns what
    /// was requested.
    pub async fn toggle(&self) -> Result<bool, CommandError> {
        let _guard = self.in_flight.lock().await;
        let desired = !self.state.watering();
        self.issue(desired).await.map(|()| desired)
    }

    async fn issue(&self, desired: bool) -> Result<(), CommandError> {
        let pending = self.state.begin_command(desired);
        let result = self.device.send_water(desired).await;
        match &result {
            Ok(body) => tracing::info!(desired, response = %body, "watering command accepted"),
            Err(e) => tracing::error!(desired, error = %e, "watering command failed"),
        }
        pending.finish(result.is_ok());
        result.map(|_| ())
    }
}
