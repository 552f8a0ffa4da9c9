use anyhow::Result;

pub mod commander;
pub mod config;
pub mod console;
pub mod device;
pub mod error;
pub mod netinfo;
pub mod poller;
pub mod state;
pub mod types;
pub mod view;

pub use commander::WateringCommander;
pub use config::Config;
pub use device::DeviceClient;
pub use error::{CommandError, FetchError, FetchFailure};
pub use poller::{HumidityPoller, POLL_PERIOD};
pub use state::{ControlPhase, ControlState, Humidity, Snapshot};
pub use types::{HumidityPercent, SensorReading};

/// Everything the host needs, wired to one appliance.
pub struct Controller {
    pub state: ControlState,
    pub poller: HumidityPoller,
    pub commander: WateringCommander,
}

pub fn build_controller(config: &Config, host_ip: String) -> Result<Controller> {
    let device = DeviceClient::new(config)?;
    let state = ControlState::new(host_ip);
    Ok(Controller {
        poller: HumidityPoller::new(device.clone(), state.clone()),
        commander: WateringCommander::new(device, state.clone()),
        state,
    })
}
