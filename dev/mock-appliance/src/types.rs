pub use polivalka::types::{HumidityResp, RAW_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appliance {
    /// Simulated ADC reading, 0 wet .. 1023 dry.
    pub raw: i64,
    pub pump_on: bool,
}

impl Appliance {
    /// Soil gets wetter while the pump runs and dries out otherwise.
    pub fn drift(&mut self, step: i64) {
        self.raw = if self.pump_on {
            (self.raw - step).max(0)
        } else {
            (self.raw + step).min(RAW_MAX)
        };
    }
}
