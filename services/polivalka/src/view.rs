use std::fmt::Write;

use crate::state::{ControlPhase, Humidity, Snapshot};

const BAR_WIDTH: usize = 20;

/// Text rendering of the control panel: host IP, humidity with a bar,
/// watering flag and the label of the action a toggle would take.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.host_ip);

    match snapshot.humidity {
        Humidity::Known(percent) => {
            let _ = writeln!(out, "Humidity: {percent}");
        }
        Humidity::Awaiting => {
            let _ = writeln!(out, "Humidity: --%");
        }
        Humidity::Unknown(failure) => {
            let _ = writeln!(out, "Humidity: --% ({failure})");
        }
    }
    let filled = snapshot
        .humidity
        .percent()
        .map(|p| p.value() as usize * BAR_WIDTH / 100)
        .unwrap_or(0);
    let _ = writeln!(out, "[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));

    if let Some(at) = snapshot.last_reading_at {
        let _ = writeln!(out, "Last reading: {}", at.format("%H:%M:%S UTC"));
    }

    let _ = writeln!(
        out,
        "Watering: {}",
        if snapshot.watering { "ON" } else { "OFF" }
    );
    let action = if snapshot.watering {
        "Stop Watering"
    } else {
        "Water Plant"
    };
    if snapshot.phase() == ControlPhase::AwaitingCommandResponse {
        let _ = write!(out, "[{action}] (sending...)");
    } else {
        let _ = write!(out, "[{action}]");
    }
    out
}
