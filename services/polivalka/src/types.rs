use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the appliance's ADC scale. 0 is saturated soil, 1023 is dry.
pub const RAW_MAX: i64 = 1023;

// Body of GET /humidity, shared with the dev appliance.
#[derive(Debug, Deserialize, Serialize)]
pub struct HumidityResp {
    pub humidity: i64,
}

/// Raw moisture sensor value as reported by the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading(pub i64);

/// Soil humidity in whole percent, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HumidityPercent(u8);

impl HumidityPercent {
    pub const SATURATED: HumidityPercent = HumidityPercent(100);
    pub const DRY: HumidityPercent = HumidityPercent(0);

    /// `round((1 - raw / 1023) * 100)`, clamped to `0..=100`. Readings outside
    /// the nominal ADC range clamp instead of failing.
    pub fn from_reading(reading: SensorReading) -> Self {
        let ratio = 1.0 - reading.0 as f64 / RAW_MAX as f64;
        let percent = (ratio * 100.0).round().clamp(0.0, 100.0);
        HumidityPercent(percent as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<SensorReading> for HumidityPercent {
    fn from(reading: SensorReading) -> Self {
        HumidityPercent::from_reading(reading)
    }
}

impl fmt::Display for HumidityPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Plain-text body the appliance expects on POST /water.
pub fn water_command_body(desired: bool) -> &'static str {
    if desired { "1" } else { "0" }
}
